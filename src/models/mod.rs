pub mod cd_ratio;
pub mod classifier;
pub mod clinical;
pub mod manager;

pub use cd_ratio::CdRatioModel;
pub use classifier::FundusClassifier;
pub use clinical::ClinicalModel;
pub use manager::{
    get_cd_ratio_model, get_classifier, get_clinical_model, get_model_stats, health_check,
    ModelManager, ModelStats,
};

use crate::config::OnnxConfig;
use crate::utils::error::ScreenError;
use crate::Result;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;

/// Builds a session for one artifact and discovers its single input/output
/// tensor names. All three screening models are single-input single-output
/// graphs; anything else is a malformed artifact.
fn build_session(path: &Path, onnx: &OnnxConfig, what: &str) -> Result<(Session, String, String)> {
    if !path.exists() {
        return Err(ScreenError::ModelLoad(format!(
            "{} model not found: {}",
            what,
            path.display()
        )));
    }

    tracing::info!("Loading {} model from: {}", what, path.display());

    let level = match onnx.optimization_level {
        0 => GraphOptimizationLevel::Disable,
        1 => GraphOptimizationLevel::Level1,
        2 => GraphOptimizationLevel::Level2,
        _ => GraphOptimizationLevel::Level3,
    };

    let session = Session::builder()?
        .with_optimization_level(level)?
        .with_intra_threads(onnx.intra_threads)?
        .commit_from_file(path)?;

    let input_name = session
        .inputs
        .first()
        .map(|input| input.name.clone())
        .ok_or_else(|| ScreenError::ModelLoad(format!("{} model has no inputs", what)))?;

    let output_name = session
        .outputs
        .first()
        .map(|output| output.name.clone())
        .ok_or_else(|| ScreenError::ModelLoad(format!("{} model has no outputs", what)))?;

    tracing::info!(
        "{} model loaded: input '{}', output '{}'",
        what,
        input_name,
        output_name
    );

    Ok((session, input_name, output_name))
}
