use serde::{Deserialize, Serialize};

use crate::schema::FIELD_NAMES;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub http_server: HttpServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject configurations the inference path cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.features.is_empty() {
            return Err("model.features must not be empty".to_string());
        }
        for feature in &self.model.features {
            if !FIELD_NAMES.contains(&feature.as_str()) {
                return Err(format!("model.features: unknown field '{feature}'"));
            }
        }
        if self.app.pipeline_save_file.trim().is_empty() {
            return Err("app.pipeline_save_file must not be empty".to_string());
        }
        if self.worker.max_workers == 0 {
            return Err("worker.max_workers must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Artifact file stem; the version suffix is appended at load time.
    #[serde(default = "default_pipeline_save_file")]
    pub pipeline_save_file: String,

    #[serde(default = "default_trained_model_dir")]
    pub trained_model_dir: String,

    /// Where uploads are staged before a worker picks them up.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_training_data_file_names")]
    pub training_data_file_names: Vec<String>,
}

fn default_package_name() -> String {
    "vintner".to_string()
}

fn default_pipeline_save_file() -> String {
    "wine_quality_pipeline".to_string()
}

fn default_trained_model_dir() -> String {
    "trained_models".to_string()
}

fn default_upload_dir() -> String {
    "tmp".to_string()
}

fn default_training_data_file_names() -> Vec<String> {
    vec![
        "winequality-red.csv".to_string(),
        "winequality-white.csv".to_string(),
    ]
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            pipeline_save_file: default_pipeline_save_file(),
            trained_model_dir: default_trained_model_dir(),
            upload_dir: default_upload_dir(),
            training_data_file_names: default_training_data_file_names(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_target")]
    pub target: String,

    /// Columns handed to the pipeline, in this order.
    #[serde(default = "default_features")]
    pub features: Vec<String>,

    #[serde(default = "default_categorical_vars")]
    pub categorical_vars: Vec<String>,

    #[serde(default = "default_numerical_vars")]
    pub numerical_vars: Vec<String>,

    #[serde(default = "default_test_size")]
    pub test_size: f64,

    #[serde(default = "default_random_state")]
    pub random_state: u64,

    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
}

fn default_target() -> String {
    "Quality".to_string()
}

fn default_numerical_vars() -> Vec<String> {
    [
        "FixedAcidity",
        "VolatileAcidity",
        "CitricAcid",
        "ResidualSugar",
        "Chlorides",
        "FreeSulfurDioxide",
        "TotalSulfurDioxide",
        "Density",
        "PH",
        "Sulphates",
        "Alcohol",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_categorical_vars() -> Vec<String> {
    vec!["Color".to_string()]
}

fn default_features() -> Vec<String> {
    let mut features = default_numerical_vars();
    features.extend(default_categorical_vars());
    features
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_state() -> u64 {
    42
}

fn default_n_estimators() -> usize {
    100
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            features: default_features(),
            categorical_vars: default_categorical_vars(),
            numerical_vars: default_numerical_vars(),
            test_size: default_test_size(),
            random_state: default_random_state(),
            n_estimators: default_n_estimators(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Seconds a finished task stays visible. 0 keeps tasks forever.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_max_workers() -> usize {
    5
}

fn default_retention_secs() -> u64 {
    3_600
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,

    /// Blob service root, e.g. `https://<account>.blob.core.windows.net`.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_storage_container")]
    pub container: String,

    /// Shared access signature appended as the query string. Normally supplied
    /// through `VINTNER_STORAGE_SAS_TOKEN` rather than the config file.
    #[serde(default)]
    pub sas_token: String,

    #[serde(default = "default_storage_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_storage_enabled() -> bool {
    true
}

fn default_storage_container() -> String {
    "ml-models".to_string()
}

fn default_storage_timeout_ms() -> u64 {
    60_000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            base_url: String::new(),
            container: default_storage_container(),
            sas_token: String::new(),
            timeout_ms: default_storage_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "vintner_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.worker.max_workers, 5);
        assert_eq!(cfg.http_server.host, "0.0.0.0");
        assert_eq!(cfg.model.features.len(), 12);
        assert_eq!(cfg.model.features.last().map(String::as_str), Some("Color"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [worker]
            max_workers = 2

            [storage]
            base_url = "https://example.blob.core.windows.net"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.worker.max_workers, 2);
        assert_eq!(cfg.worker.retention_secs, 3_600);
        assert_eq!(cfg.storage.container, "ml-models");
        assert_eq!(cfg.app.pipeline_save_file, "wine_quality_pipeline");
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let mut cfg = AppConfig::default();
        cfg.model.features.push("Sweetness".to_string());
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("Sweetness"));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut cfg = AppConfig::default();
        cfg.worker.max_workers = 0;
        assert!(cfg.validate().is_err());
    }
}
