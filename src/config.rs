use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,

    /// Directory holding the three frozen model artifacts
    pub models_dir: PathBuf,

    /// Directory holding the HTML templates and static assets
    pub templates_dir: PathBuf,

    /// Worker thread count
    pub workers: usize,

    /// Development mode
    pub dev_mode: bool,

    /// ONNX Runtime settings
    pub onnx_config: OnnxConfig,

    /// HTTP server settings
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// Intra-op CPU threads per session
    pub intra_threads: usize,

    /// Graph optimization level
    pub optimization_level: i32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// Maximum concurrent connections
    pub max_connections: usize,
}

impl Config {
    pub fn new(
        bind_addr: String,
        models_dir: String,
        templates_dir: String,
        workers: Option<usize>,
        dev_mode: bool,
    ) -> Result<Self> {
        let cpu_cores = num_cpus::get();
        let workers = workers.unwrap_or(cpu_cores);

        let onnx_config = OnnxConfig {
            intra_threads: (cpu_cores * 3 / 4).max(1),
            optimization_level: 3,
        };

        let server_config = ServerConfig {
            request_timeout: if dev_mode { 300 } else { 60 },
            max_request_size: 25 * 1024 * 1024, // fundus photographs stay well under 25MB
            max_connections: if dev_mode { 10 } else { 1000 },
        };

        Ok(Self {
            bind_addr,
            models_dir: PathBuf::from(models_dir),
            templates_dir: PathBuf::from(templates_dir),
            workers,
            dev_mode,
            onnx_config,
            server_config,
        })
    }

    /// Clinical tabular classifier artifact
    pub fn clinical_model_path(&self) -> PathBuf {
        self.models_dir.join("glaucoma_detection_model.onnx")
    }

    /// Cup-to-disc ratio regression artifact
    pub fn cd_ratio_model_path(&self) -> PathBuf {
        self.models_dir.join("cd_ratio_model.onnx")
    }

    /// Fundus-image glaucoma classifier artifact
    pub fn classifier_model_path(&self) -> PathBuf {
        self.models_dir.join("cnn_glaucoma_model_lag.onnx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::new(
            "127.0.0.1:0".to_string(),
            "models".to_string(),
            "templates".to_string(),
            Some(2),
            false,
        )
        .unwrap()
    }

    #[test]
    fn model_paths_resolve_under_models_dir() {
        let config = test_config();
        assert_eq!(
            config.clinical_model_path(),
            PathBuf::from("models/glaucoma_detection_model.onnx")
        );
        assert_eq!(
            config.cd_ratio_model_path(),
            PathBuf::from("models/cd_ratio_model.onnx")
        );
        assert_eq!(
            config.classifier_model_path(),
            PathBuf::from("models/cnn_glaucoma_model_lag.onnx")
        );
    }

    #[test]
    fn prod_mode_uses_short_timeout() {
        let config = test_config();
        assert_eq!(config.server_config.request_timeout, 60);
        assert!(config.onnx_config.intra_threads >= 1);
    }
}
