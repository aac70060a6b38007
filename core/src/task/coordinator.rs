use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::registry::TaskRegistry;
use super::types::{TaskResult, TaskStats, TaskStatus};
use super::workflow::Workflow;
use crate::error::TaskError;
use crate::model::PredictionResult;

/// Accepts uploaded files, runs them on a bounded pool and tracks their outcome.
#[derive(Clone)]
pub struct TaskCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    registry: TaskRegistry,
    workflow: Arc<dyn Workflow>,
    permits: Arc<Semaphore>,
    max_workers: usize,
}

impl TaskCoordinator {
    pub fn new(workflow: Arc<dyn Workflow>, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            inner: Arc::new(CoordinatorInner {
                registry: TaskRegistry::new(),
                workflow,
                permits: Arc::new(Semaphore::new(max_workers)),
                max_workers,
            }),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.inner.max_workers
    }

    /// Register a new task for `file_path` and schedule it.
    ///
    /// The task is visible as `processing` before this returns. The file is
    /// owned by the task from here on and is deleted once it finishes.
    /// Must be called from within a Tokio runtime.
    pub async fn submit(&self, file_path: PathBuf) -> String {
        let task_id = Uuid::new_v4().to_string();
        self.inner.registry.register(&task_id).await;

        let inner = self.inner.clone();
        let id = task_id.clone();
        tokio::spawn(async move {
            match inner.permits.clone().acquire_owned().await {
                Ok(_permit) => inner.execute(&id, &file_path).await,
                Err(_) => {
                    inner
                        .settle(&id, Err(TaskError::Worker("worker pool closed".into())))
                        .await;
                    remove_input(&id, &file_path).await;
                }
            }
        });

        info!(task_id = %task_id, workflow = self.inner.workflow.name(), "task submitted");
        task_id
    }

    /// `None` for ids that were never issued or have been evicted.
    pub async fn get_status(&self, task_id: &str) -> Option<TaskStatus> {
        self.inner.registry.status(task_id).await
    }

    /// `None` while the task is still running, and for unknown ids.
    pub async fn get_result(&self, task_id: &str) -> Option<TaskResult> {
        self.inner.registry.result(task_id).await
    }

    pub async fn stats(&self) -> TaskStats {
        self.inner.registry.stats().await
    }

    /// Evict tasks that finished more than `retention` ago.
    pub async fn evict_expired(&self, retention: Duration) -> usize {
        let Ok(retention) = chrono::Duration::from_std(retention) else {
            return 0;
        };
        let Some(cutoff) = Utc::now().checked_sub_signed(retention) else {
            return 0;
        };
        self.inner.registry.evict_finished_before(cutoff).await
    }

    /// Periodically evict finished tasks. A zero `retention` keeps them forever
    /// and no sweeper is started.
    pub fn spawn_sweeper(&self, retention: Duration, every: Duration) -> Option<JoinHandle<()>> {
        if retention.is_zero() {
            return None;
        }
        let every = every.max(Duration::from_secs(1));
        let coordinator = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = coordinator.evict_expired(retention).await;
                if evicted > 0 {
                    info!(evicted, "retention sweep");
                }
            }
        }))
    }
}

impl CoordinatorInner {
    async fn execute(&self, task_id: &str, input: &Path) {
        let started = Instant::now();
        info!(task_id, "task started");

        let outcome = AssertUnwindSafe(self.workflow.run(input))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(TaskError::Worker(panic_message(panic.as_ref()))));

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(result) => info!(
                task_id,
                predictions = result.predictions.len(),
                elapsed_ms,
                "Results gathered"
            ),
            Err(TaskError::Worker(reason)) => {
                error!(task_id, elapsed_ms, reason = %reason, "task crashed")
            }
            Err(err) => warn!(task_id, elapsed_ms, error = %err, "task failed"),
        }

        self.settle(task_id, outcome).await;
        remove_input(task_id, input).await;
    }

    async fn settle(&self, task_id: &str, outcome: Result<PredictionResult, TaskError>) {
        match outcome {
            Ok(result) => self.registry.complete(task_id, result).await,
            Err(err) => self.registry.fail(task_id, err.client_detail()).await,
        };
    }
}

async fn remove_input(task_id: &str, path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(task_id, path = %path.display(), "input removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(task_id, path = %path.display(), "input already gone")
        }
        Err(e) => warn!(task_id, path = %path.display(), error = %e, "failed to remove input"),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
