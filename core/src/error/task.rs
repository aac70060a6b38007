use thiserror::Error;

use super::{DatasetError, ModelError};
use crate::schema::ValidationReport;

/// Everything that can end a task in the `failed` state.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("worker error: {0}")]
    Worker(String),
}

impl From<ValidationReport> for TaskError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}

impl TaskError {
    /// Text published after `failed: ` and under `"error"` in the result.
    ///
    /// Validation failures serialize the structured report; other kinds use a
    /// short message without local paths.
    pub fn client_detail(&self) -> String {
        match self {
            Self::Dataset(e) => e.client_message(),
            Self::Validation(report) => report.to_json(),
            Self::Model(e) => e.client_message(),
            Self::Worker(_) => "internal worker error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_detail_hides_paths() {
        let err = TaskError::from(DatasetError::NotFound("/srv/tmp/abc.csv".to_string()));
        let detail = err.client_detail();
        assert!(!detail.contains("/srv/tmp"));
        assert_eq!(detail, "input file does not exist");
    }

    #[test]
    fn test_client_detail_for_missing_artifact() {
        let err = TaskError::from(ModelError::ArtifactMissing {
            artifact: "wine_quality_pipeline_0.1.0.json".to_string(),
            reason: "remote store disabled".to_string(),
        });
        assert_eq!(
            err.client_detail(),
            "model artifact wine_quality_pipeline_0.1.0.json is unavailable"
        );
    }

    #[test]
    fn test_worker_error_detail_is_generic() {
        let err = TaskError::Worker("thread panicked at src/x.rs:1".to_string());
        assert_eq!(err.client_detail(), "internal worker error");
    }
}
