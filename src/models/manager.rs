use crate::models::{CdRatioModel, ClinicalModel, FundusClassifier};
use crate::utils::error::ScreenError;
use crate::{Config, Result};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

/// Process-wide model registry. All three artifacts are mandatory: a missing
/// or malformed file fails `init`, which aborts startup.
pub struct ModelManager {
    clinical: Arc<ClinicalModel>,
    cd_ratio: Arc<CdRatioModel>,
    classifier: Arc<FundusClassifier>,
    config: Config,
}

static MODEL_MANAGER: OnceCell<Arc<Mutex<ModelManager>>> = OnceCell::new();

impl ModelManager {
    /// Loads the three models and installs the global manager.
    pub fn init(config: Config) -> Result<()> {
        tracing::info!("Initializing model manager...");

        let clinical = Arc::new(ClinicalModel::new(&config)?);
        let cd_ratio = Arc::new(CdRatioModel::new(&config)?);
        let classifier = Arc::new(FundusClassifier::new(&config)?);

        let manager = ModelManager {
            clinical,
            cd_ratio,
            classifier,
            config,
        };

        MODEL_MANAGER
            .set(Arc::new(Mutex::new(manager)))
            .map_err(|_| ScreenError::Internal("Model manager already initialized".to_string()))?;

        tracing::info!("Model manager initialized successfully");
        Ok(())
    }

    pub fn instance() -> Result<Arc<Mutex<ModelManager>>> {
        MODEL_MANAGER
            .get()
            .cloned()
            .ok_or_else(|| ScreenError::Internal("Model manager not initialized".to_string()))
    }

    pub fn clinical(&self) -> Arc<ClinicalModel> {
        Arc::clone(&self.clinical)
    }

    pub fn cd_ratio(&self) -> Arc<CdRatioModel> {
        Arc::clone(&self.cd_ratio)
    }

    pub fn classifier(&self) -> Arc<FundusClassifier> {
        Arc::clone(&self.classifier)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verifies the artifacts backing the loaded sessions are still on disk.
    pub fn health_check(&self) -> Result<()> {
        for path in [
            self.config.clinical_model_path(),
            self.config.cd_ratio_model_path(),
            self.config.classifier_model_path(),
        ] {
            if !path.exists() {
                return Err(ScreenError::ModelLoad(format!(
                    "Model artifact missing from disk: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    pub fn get_stats(&self) -> ModelStats {
        ModelStats {
            clinical_loaded: true,
            cd_ratio_loaded: true,
            classifier_loaded: true,
            intra_threads: self.config.onnx_config.intra_threads,
            optimization_level: self.config.onnx_config.optimization_level,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelStats {
    pub clinical_loaded: bool,
    pub cd_ratio_loaded: bool,
    pub classifier_loaded: bool,
    pub intra_threads: usize,
    pub optimization_level: i32,
}

pub fn get_clinical_model() -> Result<Arc<ClinicalModel>> {
    let manager = ModelManager::instance()?;
    let guard = manager.lock();
    Ok(guard.clinical())
}

pub fn get_cd_ratio_model() -> Result<Arc<CdRatioModel>> {
    let manager = ModelManager::instance()?;
    let guard = manager.lock();
    Ok(guard.cd_ratio())
}

pub fn get_classifier() -> Result<Arc<FundusClassifier>> {
    let manager = ModelManager::instance()?;
    let guard = manager.lock();
    Ok(guard.classifier())
}

pub fn health_check() -> Result<()> {
    let manager = ModelManager::instance()?;
    let guard = manager.lock();
    guard.health_check()
}

pub fn get_model_stats() -> Result<ModelStats> {
    let manager = ModelManager::instance()?;
    let guard = manager.lock();
    Ok(guard.get_stats())
}
