mod common;

use common::{
    coordinator, wait_for_result, wait_until_removed, write_upload, RED_ROW, WHITE_ROW,
};
use vintner_core::api::{status_label, TaskResult, TaskStatus};

#[tokio::test]
async fn incomplete_rows_are_dropped_before_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator(dir.path(), 2);
    let missing_citric = RED_ROW.replace(";0;", ";;");
    let upload = write_upload(dir.path(), "upload.csv", &[RED_ROW, &missing_citric, WHITE_ROW]);

    let id = coordinator.submit(upload.clone()).await;
    assert_eq!(wait_for_result(&coordinator, &id).await, TaskStatus::Completed);

    match coordinator.get_result(&id).await {
        Some(TaskResult::Completed(result)) => {
            assert_eq!(result.predictions, vec![5, 7]);
            assert_eq!(result.version, "0.1.0");
        }
        other => panic!("expected completed result, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_quality_fails_the_task() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator(dir.path(), 2);
    let bad = RED_ROW.replace(";5;red", ";high;red");
    let upload = write_upload(dir.path(), "upload.csv", &[RED_ROW, &bad]);

    let id = coordinator.submit(upload.clone()).await;
    let status = wait_for_result(&coordinator, &id).await;
    let label = status_label(Some(&status));
    assert!(label.starts_with("failed: "), "unexpected status {label}");
    assert!(label.contains("Quality"));

    match coordinator.get_result(&id).await {
        Some(TaskResult::Failed(report)) => {
            assert_eq!(report.status, "failed");
            assert!(report.error.contains("\"field\":\"Quality\""));
        }
        other => panic!("expected failure report, got {other:?}"),
    }
    assert!(wait_until_removed(&upload).await, "failed task left its input behind");
}

#[tokio::test]
async fn unknown_task_id_has_no_status() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator(dir.path(), 1);
    let status = coordinator.get_status("nonexistent").await;
    assert_eq!(status_label(status.as_ref()), "unknown task id");
    assert!(coordinator.get_result("nonexistent").await.is_none());
}

#[tokio::test]
async fn concurrent_uploads_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator(dir.path(), 3);

    let mut submitted = Vec::new();
    for i in 0..8 {
        let (row, expected) = if i % 2 == 0 { (RED_ROW, 5) } else { (WHITE_ROW, 7) };
        let upload = write_upload(dir.path(), &format!("upload-{i}.csv"), &[row]);
        submitted.push((coordinator.submit(upload.clone()).await, upload, expected));
    }

    for (id, _, expected) in &submitted {
        assert_eq!(wait_for_result(&coordinator, id).await, TaskStatus::Completed);
        match coordinator.get_result(id).await {
            Some(TaskResult::Completed(result)) => assert_eq!(result.predictions, vec![*expected]),
            other => panic!("expected completed result, got {other:?}"),
        }
    }

    // Inputs are removed once each task finishes.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(submitted.iter().all(|(_, path, _)| !path.exists()));
}

#[tokio::test]
async fn header_only_upload_fails_without_leaking_paths() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator(dir.path(), 1);
    let upload = write_upload(dir.path(), "empty.csv", &[]);

    let id = coordinator.submit(upload.clone()).await;
    match wait_for_result(&coordinator, &id).await {
        TaskStatus::Failed(detail) => {
            assert!(!detail.contains(dir.path().to_str().unwrap()));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(wait_until_removed(&upload).await);
}
