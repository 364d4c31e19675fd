use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0} bytes, max allowed: {1} bytes")]
    FileTooLarge(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ScreenError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScreenError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScreenError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            ScreenError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ScreenError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            ScreenError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScreenError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ScreenError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            ScreenError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            ScreenError::Inference(_) => "INFERENCE_ERROR",
            ScreenError::InvalidInput(_) => "INVALID_INPUT",
            ScreenError::FileTooLarge(_, _) => "FILE_TOO_LARGE",
            ScreenError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ScreenError::Config(_) => "CONFIG_ERROR",
            ScreenError::Io(_) => "IO_ERROR",
            ScreenError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            ScreenError::Ort(_) => "ORT_ERROR",
            ScreenError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ScreenError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        tracing::error!("Request failed: {} ({})", self, status);

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = ScreenError::InvalidInput("field 'age' is not a number".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn model_load_maps_to_service_unavailable() {
        let err = ScreenError::ModelLoad("missing file".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
