use crate::utils::error::ScreenError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{inputs, session::Session, value::Tensor};
use parking_lot::Mutex;
use std::sync::Arc;

/// Convolutional glaucoma classifier trained on fundus photographs.
///
/// Scores below [`FundusClassifier::GLAUCOMA_THRESHOLD`] indicate glaucoma;
/// the cutoff comes from the training run, not from this service.
pub struct FundusClassifier {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
}

impl FundusClassifier {
    pub const GLAUCOMA_THRESHOLD: f32 = 0.5;

    pub fn new(config: &Config) -> Result<Self> {
        let (session, input_name, output_name) = super::build_session(
            &config.classifier_model_path(),
            &config.onnx_config,
            "fundus classifier",
        )?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        })
    }

    /// Raw classifier score for one `(1, 224, 224, 3)` image tensor.
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
                        "Classifier output '{}' not found. Available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        predictions.iter().copied().next().ok_or_else(|| {
            ScreenError::Inference("Fundus classifier returned an empty tensor".to_string())
        })
    }
}
