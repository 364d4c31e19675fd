use crate::screening::ClinicalRecord;
use crate::utils::error::ScreenError;
use crate::{Config, Result};
use ndarray::Array2;
use ort::{inputs, session::Session, value::Tensor};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tabular glaucoma classifier over ten clinical measurements.
///
/// The artifact expects a `(1, 10)` f32 row in training-time feature order
/// and yields a `(1, 1)` probability.
pub struct ClinicalModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
}

impl ClinicalModel {
    pub fn new(config: &Config) -> Result<Self> {
        let (session, input_name, output_name) = super::build_session(
            &config.clinical_model_path(),
            &config.onnx_config,
            "clinical",
        )?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        })
    }

    /// Raw predicted probability for one record.
    pub fn predict(&self, record: &ClinicalRecord) -> Result<f32> {
        let features = record.feature_vector();
        let input = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ScreenError::Inference(format!("Failed to shape input row: {}", e)))?;

        let input_tensor = Tensor::from_array(input)?;
        let predictions = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available: Vec<String> = outputs.keys().map(|s| s.to_string()).collect();
                    return Err(ScreenError::Inference(format!(
                        "Clinical output '{}' not found. Available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        let shape = predictions.shape();
        if shape.first().copied() != Some(1) {
            return Err(ScreenError::Inference(format!(
                "Expected batch size 1 from clinical model, got shape {:?}",
                shape
            )));
        }

        predictions
            .iter()
            .copied()
            .next()
            .ok_or_else(|| ScreenError::Inference("Clinical model returned an empty tensor".to_string()))
    }
}
