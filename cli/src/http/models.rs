//! HTTP API data models

use std::collections::BTreeMap;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vintner_core::api::TaskStats;

pub const UPLOAD_ACCEPTED_MSG: &str = "File uploaded and processing started!";
pub const INVALID_UPLOAD_MSG: &str = "Invalid file format. Please upload a CSV file.";

// ============= Predict =============

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub task_id: String,
    pub msg: String,
}

// ============= Status =============

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub task_id: String,
    pub status: String,
}

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: f64,
    pub requests_handled: u64,
    pub requests_by_endpoint: BTreeMap<String, u64>,
    pub errors: u64,
    pub tasks: TaskStats,
}

// ============= Errors =============

#[derive(Debug)]
pub enum ApiError {
    /// Missing `file` field or a name not ending in `.csv`.
    InvalidUpload,
    /// Malformed or oversized multipart body.
    Multipart { status: StatusCode, message: String },
    TaskNotFound,
    /// Logged in full; the client only sees a generic message.
    Internal(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidUpload => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "msg": INVALID_UPLOAD_MSG }),
            ),
            Self::Multipart { status, message } => (status, serde_json::json!({ "msg": message })),
            Self::TaskNotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "Task not found" }),
            ),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_upload_is_400() {
        let resp = ApiError::InvalidUpload.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_task_not_found_is_404() {
        let resp = ApiError::TaskNotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_is_500() {
        let resp = ApiError::Internal("disk full at /srv/tmp".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_health_response_shape() {
        let health = HealthResponse {
            status: "ok".to_string(),
            uptime_seconds: 1.5,
            requests_handled: 3,
            requests_by_endpoint: BTreeMap::from([("/predict".to_string(), 3)]),
            errors: 1,
            tasks: TaskStats {
                processing: 1,
                completed: 2,
                failed: 0,
            },
        };
        let v = serde_json::to_value(health).unwrap();
        assert_eq!(v["tasks"]["completed"], 2);
        assert_eq!(v["status"], "ok");
        assert_eq!(v["requests_by_endpoint"]["/predict"], 3);
        assert_eq!(v["errors"], 1);
    }
}
