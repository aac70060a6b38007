//! HTTP route handlers

use std::io::Write;
use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use vintner_core::api::{status_label, TaskResult};

use crate::http::{
    models::*,
    state::AppState,
    validation::validate_upload_name,
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const USER_DATA_JS: &str = include_str!("../../static/user_data.js");

/// Build every route
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.http_server.max_upload_bytes;
    Router::new()
        .route("/", get(index_handler))
        .route("/static/user_data.js", get(script_handler))
        .route("/predict", post(predict_handler))
        .route("/status/:task_id", get(status_handler))
        .route("/results/:task_id", get(results_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// GET / - landing page
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/user_data.js - upload and polling script
async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        USER_DATA_JS,
    )
}

/// POST /predict - stage the upload and start a task
async fn predict_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    state.record_request("/predict");

    let staged = match stage_from_multipart(&state.upload_dir, multipart).await {
        Ok(path) => path,
        Err(e) => {
            state.record_error();
            return Err(e);
        }
    };

    let task_id = state.coordinator.submit(staged).await;
    Ok(Json(UploadResponse {
        task_id,
        msg: UPLOAD_ACCEPTED_MSG.to_string(),
    }))
}

/// Take the first `file` field, check its name and persist it under `upload_dir`.
async fn stage_from_multipart(
    upload_dir: &FsPath,
    mut multipart: Multipart,
) -> Result<PathBuf, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        validate_upload_name(field.file_name())?;
        let data = field.bytes().await?;
        return stage_upload(upload_dir.to_path_buf(), data).await;
    }
    Err(ApiError::InvalidUpload)
}

/// Write the upload to a uniquely named `.csv` file that outlives this request.
async fn stage_upload(dir: PathBuf, data: Bytes) -> Result<PathBuf, ApiError> {
    tokio::task::spawn_blocking(move || -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".csv")
            .tempfile_in(&dir)?;
        file.write_all(&data)?;
        file.as_file().sync_all()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("staging task failed: {e}")))?
    .map_err(|e| ApiError::Internal(format!("failed to stage upload: {e}")))
}

/// GET /status/:task_id - always 200, unknown ids get the sentinel status
async fn status_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Json<StatusResponse> {
    state.record_request("/status");
    let status = state.coordinator.get_status(&task_id).await;
    Json(StatusResponse {
        status: status_label(status.as_ref()),
        task_id,
    })
}

/// GET /results/:task_id - stored result, or 404 while running / unknown
async fn results_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResult>, ApiError> {
    state.record_request("/results");
    match state.coordinator.get_result(&task_id).await {
        Some(result) => Ok(Json(result)),
        None => Err(ApiError::TaskNotFound),
    }
}

/// GET /health - liveness, request and error counters, task counts
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let snap = state.snapshot();
    Json(HealthResponse {
        status: "ok".into(),
        uptime_seconds: snap.uptime_seconds,
        requests_handled: snap.requests_total,
        requests_by_endpoint: snap.requests_by_endpoint,
        errors: snap.errors_total,
        tasks: state.coordinator.stats().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use vintner_core::api::{AppConfig, PredictionResult, TaskCoordinator, TaskError, Workflow};

    /// Predicts one label per non-header line; a body containing "high" fails.
    struct LineCountWorkflow;

    #[async_trait]
    impl Workflow for LineCountWorkflow {
        fn name(&self) -> &str {
            "line-count"
        }

        async fn run(&self, input: &FsPath) -> Result<PredictionResult, TaskError> {
            let body = tokio::fs::read_to_string(input)
                .await
                .map_err(|e| TaskError::Worker(e.to_string()))?;
            if body.contains("high") {
                return Err(TaskError::Worker("bad quality".to_string()));
            }
            let rows = body.lines().skip(1).filter(|l| !l.trim().is_empty()).count();
            Ok(PredictionResult {
                predictions: vec![5; rows],
                version: "0.1.0".to_string(),
            })
        }
    }

    fn test_state(upload_dir: &FsPath) -> AppState {
        let mut config = AppConfig::default();
        config.app.upload_dir = upload_dir.display().to_string();
        AppState::new(TaskCoordinator::new(Arc::new(LineCountWorkflow), 2), config)
    }

    const BOUNDARY: &str = "vintner-test-boundary";

    fn multipart_request(field: &str, file_name: &str, body: &str) -> Request<Body> {
        let payload = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n{body}\r\n--{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn wait_for_result(app: &Router, task_id: &str) -> serde_json::Value {
        for _ in 0..200 {
            let resp = app
                .clone()
                .oneshot(get(&format!("/results/{task_id}")))
                .await
                .unwrap();
            if resp.status() == StatusCode::OK {
                return json_body(resp).await;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no result for {task_id}");
    }

    #[tokio::test]
    async fn test_upload_then_poll_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let resp = app
            .clone()
            .oneshot(multipart_request("file", "wine.csv", "h\n1\n2\n"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["msg"], "File uploaded and processing started!");
        let task_id = body["task_id"].as_str().unwrap().to_string();

        let result = wait_for_result(&app, &task_id).await;
        assert_eq!(
            result,
            serde_json::json!({"predictions": [5, 5], "version": "0.1.0"})
        );

        let resp = app
            .clone()
            .oneshot(get(&format!("/status/{task_id}")))
            .await
            .unwrap();
        let status = json_body(resp).await;
        assert_eq!(status["status"], "completed");
        assert_eq!(status["task_id"], task_id.as_str());
    }

    #[tokio::test]
    async fn test_non_csv_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let resp = app
            .oneshot(multipart_request("file", "wine.txt", "h\n1\n"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await,
            serde_json::json!({"msg": "Invalid file format. Please upload a CSV file."})
        );
        // Nothing was staged.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));
        let resp = app
            .oneshot(multipart_request("attachment", "wine.csv", "h\n1\n"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_task_exposes_error_payload() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let resp = app
            .clone()
            .oneshot(multipart_request("file", "wine.csv", "h\nhigh\n"))
            .await
            .unwrap();
        let task_id = json_body(resp).await["task_id"]
            .as_str()
            .unwrap()
            .to_string();

        let result = wait_for_result(&app, &task_id).await;
        assert_eq!(result["status"], "failed");
        assert_eq!(result["error"], "internal worker error");

        let resp = app
            .oneshot(get(&format!("/status/{task_id}")))
            .await
            .unwrap();
        assert_eq!(
            json_body(resp).await["status"],
            "failed: internal worker error"
        );
    }

    #[tokio::test]
    async fn test_unknown_task_id() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let resp = app.clone().oneshot(get("/status/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "unknown task id");

        let resp = app.oneshot(get("/results/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(resp).await,
            serde_json::json!({"error": "Task not found"})
        );
    }

    #[tokio::test]
    async fn test_landing_page_and_script() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        let resp = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("/static/user_data.js"));

        let resp = app.oneshot(get("/static/user_data.js")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_counts_requests() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(dir.path()));

        app.clone().oneshot(get("/status/x")).await.unwrap();
        app.clone().oneshot(get("/status/y")).await.unwrap();
        let rejected = app
            .clone()
            .oneshot(multipart_request("file", "wine.txt", "a;b\n1;2\n"))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

        let resp = app.oneshot(get("/health")).await.unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["requests_handled"], 3);
        assert_eq!(body["requests_by_endpoint"]["/status"], 2);
        assert_eq!(body["requests_by_endpoint"]["/predict"], 1);
        assert_eq!(body["errors"], 1);
        assert_eq!(body["tasks"]["processing"], 0);
    }
}
