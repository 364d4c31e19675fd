use crate::Result;
use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

/// Spatial resolution both convolutional models were trained at.
pub const INPUT_WIDTH: u32 = 224;
pub const INPUT_HEIGHT: u32 = 224;

pub struct FundusPreprocessor;

impl FundusPreprocessor {
    /// Builds the model input for a decoded upload: resize to exactly
    /// 224x224 (no aspect-ratio padding, matching how the models were fed
    /// during training), scale pixels to [0,1], prepend the batch axis.
    /// Layout is NHWC.
    pub fn to_model_input(image: &DynamicImage) -> Result<Array4<f32>> {
        let resized = image
            .resize_exact(INPUT_WIDTH, INPUT_HEIGHT, FilterType::Nearest)
            .to_rgb8();

        let mut tensor = Array4::<f32>::zeros((
            1,
            INPUT_HEIGHT as usize,
            INPUT_WIDTH as usize,
            3,
        ));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
            }
        }

        Ok(tensor)
    }
}
