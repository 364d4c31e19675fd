use crate::utils::error::ScreenError;
use crate::Result;
use axum::body::Bytes;
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Hard cap on decoded uploads, matching the HTTP body limit.
const MAX_IMAGE_BYTES: usize = 25 * 1024 * 1024;

pub struct ImageLoader;

impl ImageLoader {
    /// Decodes an uploaded image from raw bytes.
    pub fn from_bytes(bytes: &Bytes) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(ScreenError::InvalidInput("Empty file".to_string()));
        }

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ScreenError::FileTooLarge(bytes.len(), MAX_IMAGE_BYTES));
        }

        if let Some(format) = Self::detect_format(bytes) {
            if !Self::is_supported_format(format) {
                return Err(ScreenError::UnsupportedFormat(format!("{:?}", format)));
            }
        }

        let image = image::load_from_memory(bytes).map_err(ScreenError::ImageDecode)?;

        Self::validate_dimensions(&image)?;

        Ok(image)
    }

    pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes).ok()
    }

    pub fn is_supported_format(format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Png
                | ImageFormat::Jpeg
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::WebP
        )
    }

    pub fn validate_dimensions(image: &DynamicImage) -> Result<()> {
        let (width, height) = image.dimensions();

        if width < 16 || height < 16 {
            return Err(ScreenError::InvalidInput(format!(
                "Image too small: {}x{}, minimum 16x16",
                width, height
            )));
        }

        if width > 8192 || height > 8192 {
            return Err(ScreenError::InvalidInput(format!(
                "Image too large: {}x{}, maximum 8192x8192",
                width, height
            )));
        }

        Ok(())
    }

    /// Base64 `data:` payload echoing the original upload back into the page.
    pub fn to_base64_echo(bytes: &[u8]) -> String {
        let mime = match Self::detect_format(bytes) {
            Some(ImageFormat::Png) => "image/png",
            Some(ImageFormat::Bmp) => "image/bmp",
            Some(ImageFormat::Tiff) => "image/tiff",
            Some(ImageFormat::WebP) => "image/webp",
            _ => "image/jpeg",
        };

        format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }
}
