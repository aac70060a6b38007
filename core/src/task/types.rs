use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::PredictionResult;

/// Status text returned for ids the registry has never seen (or has evicted).
pub const UNKNOWN_TASK_STATUS: &str = "unknown task id";

/// Task lifecycle as seen by polling clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Processing,
    Completed,
    /// Carries the client-facing failure detail.
    Failed(String),
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => f.write_str("processing"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(detail) => write!(f, "failed: {detail}"),
        }
    }
}

/// Wire form of a status lookup, including the unknown-id sentinel.
pub fn status_label(status: Option<&TaskStatus>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => UNKNOWN_TASK_STATUS.to_string(),
    }
}

/// `{"status": "failed", "error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub status: String,
    pub error: String,
}

/// Payload served by `GET /results/<id>` once a task is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
    Completed(PredictionResult),
    Failed(FailureReport),
}

impl TaskResult {
    pub fn failed(detail: impl Into<String>) -> Self {
        Self::Failed(FailureReport {
            status: "failed".to_string(),
            error: detail.into(),
        })
    }
}

/// Status-map entry.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub status: TaskStatus,
    /// Set on the terminal write; drives retention.
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    pub fn processing() -> Self {
        Self {
            status: TaskStatus::Processing,
            finished_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}
