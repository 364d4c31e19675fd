use crate::{
    image::{FundusPreprocessor, ImageLoader},
    models::{get_cd_ratio_model, get_classifier, get_clinical_model},
    screening::{confidence_percentage, ClinicalRecord, Diagnosis, Screening},
    Result,
};
use axum::body::Bytes;
use std::time::Instant;

/// Per-route prediction pipelines. Each one pairs an input with its model and
/// a fixed post-hoc transform; no state is kept between requests.
pub struct ScreeningPipeline;

impl ScreeningPipeline {
    /// Clinical route: ten measurements in, calibrated diagnosis out.
    pub fn clinical(record: &ClinicalRecord) -> Result<Screening> {
        let start = Instant::now();

        let model = get_clinical_model()?;
        let raw_prob = model.predict(record)?;

        let percentage = confidence_percentage(raw_prob);
        let diagnosis = Diagnosis::from_confidence(percentage);

        tracing::info!(
            "Clinical screening: raw={:.4}, confidence={:.2}%, diagnosis={}, time={:.3}s",
            raw_prob,
            percentage,
            diagnosis,
            start.elapsed().as_secs_f32()
        );

        Ok(Screening::text_only(
            format!(
                "Confidence Percentage: {:.2}%<br>Diagnosis: {}",
                percentage, diagnosis
            ),
            diagnosis.alert_class(),
        ))
    }

    /// CD-ratio route: fundus image in, raw regression output reported.
    pub fn cd_ratio(bytes: &Bytes) -> Result<Screening> {
        let start = Instant::now();

        let image = ImageLoader::from_bytes(bytes)?;
        let input = FundusPreprocessor::to_model_input(&image)?;

        let model = get_cd_ratio_model()?;
        let ratio = model.predict(&input)?;

        tracing::info!(
            "CD ratio screening: ratio={:.3}, time={:.3}s",
            ratio,
            start.elapsed().as_secs_f32()
        );

        Ok(Screening {
            prediction_text: format!("Predicted CD Ratio: {:.3}", ratio),
            alert_class: "alert-info",
            uploaded_image: Some(ImageLoader::to_base64_echo(bytes)),
        })
    }

    /// Fundus classifier route: image in, thresholded diagnosis out.
    pub fn fundus(bytes: &Bytes) -> Result<Screening> {
        let start = Instant::now();

        let image = ImageLoader::from_bytes(bytes)?;
        let input = FundusPreprocessor::to_model_input(&image)?;

        let model = get_classifier()?;
        let score = model.predict(&input)?;
        let diagnosis = Diagnosis::from_fundus_score(score);

        tracing::info!(
            "Fundus screening: score={:.3}, diagnosis={}, time={:.3}s",
            score,
            diagnosis,
            start.elapsed().as_secs_f32()
        );

        Ok(Screening {
            prediction_text: format!("Prediction: {} (score: {:.3})", diagnosis, score),
            alert_class: diagnosis.alert_class(),
            uploaded_image: Some(ImageLoader::to_base64_echo(bytes)),
        })
    }
}
