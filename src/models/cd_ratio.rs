use crate::utils::error::ScreenError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{inputs, session::Session, value::Tensor};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cup-to-disc ratio regressor over a preprocessed fundus image.
pub struct CdRatioModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
}

impl CdRatioModel {
    pub fn new(config: &Config) -> Result<Self> {
        let (session, input_name, output_name) = super::build_session(
            &config.cd_ratio_model_path(),
            &config.onnx_config,
            "CD ratio",
        )?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        })
    }

    /// Raw predicted ratio for one `(1, 224, 224, 3)` image tensor.
    pub fn predict(&self, image: &Array4<f32>) -> Result<f32> {
        let input_tensor = Tensor::from_array(image.clone())?;
        let predictions = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available: Vec<String> = outputs.keys().map(|s| s.to_string()).collect();
                    return Err(ScreenError::Inference(format!(
                        "CD ratio output '{}' not found. Available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        predictions
            .iter()
            .copied()
            .next()
            .ok_or_else(|| ScreenError::Inference("CD ratio model returned an empty tensor".to_string()))
    }
}
