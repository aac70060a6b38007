//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `vintner_core::api` instead of reaching into internal modules.

pub use crate::config::{
    get_vintner_data_dir, load_default, load_from, AppConfig, HttpServerConfig, LoggingConfig,
    ModelConfig, StorageConfig, WorkerConfig,
};
pub use crate::dataset::{clean, format_feature_name, load_dataset, RawTable, DELIMITER};
pub use crate::error::{CliError, DatasetError, ModelError, TaskError};
pub use crate::model::{
    artifact_file_name, ArtifactStore, ModelRepository, Pipeline, PredictionResult,
    PACKAGE_VERSION,
};
pub use crate::schema::{validate, ValidatedBatch, ValidationReport, WineSample, FIELD_NAMES};
pub use crate::task::{
    load_clean_validate, status_label, PredictionWorkflow, TaskCoordinator, TaskResult,
    TaskStats, TaskStatus, Workflow, UNKNOWN_TASK_STATUS,
};
