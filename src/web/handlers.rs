use crate::{
    screening::{ClinicalForm, Screening, ScreeningPipeline},
    utils::error::ScreenError,
    web::{extractors::RequestId, ui},
    Config, Result,
};
use axum::{
    body::Bytes,
    extract::{Form, Multipart, State},
    response::Html,
};

/// Multipart field name the upload forms submit the image under.
const IMAGE_FIELD: &str = "inputImage";

/// Clinical screening: parse the ten measurements, run the tabular model,
/// render the diagnosis. Validation and inference failures render in place
/// of the prediction; the submitted values are echoed back either way.
pub async fn clinical_handler(
    State(_config): State<Config>,
    RequestId(request_id): RequestId,
    Form(form): Form<ClinicalForm>,
) -> Html<String> {
    tracing::info!("Processing clinical screening: request_id={}", request_id);

    let result = match form
        .to_record()
        .and_then(|record| ScreeningPipeline::clinical(&record))
    {
        Ok(screening) => screening,
        Err(e) => {
            tracing::warn!(
                "Clinical screening failed: request_id={}, error={}",
                request_id,
                e
            );
            Screening::error(format!("Error in prediction: {}", e))
        }
    };

    Html(ui::render_clinical(Some(&result), &form))
}

/// CD-ratio screening over an uploaded fundus photograph.
pub async fn cd_ratio_handler(
    State(_config): State<Config>,
    RequestId(request_id): RequestId,
    multipart: Multipart,
) -> Html<String> {
    tracing::info!("Processing CD ratio screening: request_id={}", request_id);

    let result = match read_image_upload(multipart).await {
        Ok(bytes) => match ScreeningPipeline::cd_ratio(&bytes) {
            Ok(screening) => screening,
            Err(e) => {
                tracing::warn!(
                    "CD ratio screening failed: request_id={}, error={}",
                    request_id,
                    e
                );
                Screening::error(format!("Error in CD Ratio prediction: {}", e))
            }
        },
        Err(e) => Screening::error(format!("Error in CD Ratio prediction: {}", e)),
    };

    Html(ui::render_cd_ratio(Some(&result)))
}

/// Fundus-classifier screening over an uploaded photograph.
pub async fn custom_glaucoma_handler(
    State(_config): State<Config>,
    RequestId(request_id): RequestId,
    multipart: Multipart,
) -> Html<String> {
    tracing::info!("Processing fundus screening: request_id={}", request_id);

    let result = match read_image_upload(multipart).await {
        Ok(bytes) => match ScreeningPipeline::fundus(&bytes) {
            Ok(screening) => screening,
            Err(e) => {
                tracing::warn!(
                    "Fundus screening failed: request_id={}, error={}",
                    request_id,
                    e
                );
                Screening::error(format!("Error in prediction: {}", e))
            }
        },
        Err(e) => Screening::error(format!("Error in prediction: {}", e)),
    };

    Html(ui::render_custom_glaucoma(Some(&result)))
}

/// Walks the multipart stream looking for the image field. Mirrors the
/// upload contract of the HTML forms: a request without the field, with an
/// empty filename, or with an empty body is a validation error.
async fn read_image_upload(mut multipart: Multipart) -> Result<Bytes> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ScreenError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        if field_name != IMAGE_FIELD {
            tracing::debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        if field.file_name().map_or(true, |name| name.is_empty()) {
            return Err(ScreenError::InvalidInput(
                "No file selected for uploading".to_string(),
            ));
        }

        if let Some(content_type) = field.content_type() {
            if !content_type.starts_with("image/") {
                return Err(ScreenError::UnsupportedFormat(content_type.to_string()));
            }
        }

        let data = field.bytes().await.map_err(|e| {
            ScreenError::InvalidInput(format!("Failed to read file data: {}", e))
        })?;

        if data.is_empty() {
            return Err(ScreenError::InvalidInput(
                "No file selected for uploading".to_string(),
            ));
        }

        tracing::debug!("Received file: {} bytes", data.len());
        return Ok(data);
    }

    Err(ScreenError::InvalidInput(
        "No file part in the request".to_string(),
    ))
}
