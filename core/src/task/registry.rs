//! Task status and result maps.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::types::{TaskRecord, TaskResult, TaskStats, TaskStatus};
use crate::model::PredictionResult;

/// Two independently locked maps keyed by task id.
///
/// Each write holds exactly one lock for one map operation.
#[derive(Default)]
pub struct TaskRegistry {
    statuses: RwLock<HashMap<String, TaskRecord>>,
    results: RwLock<HashMap<String, TaskResult>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly submitted task as `processing`.
    pub async fn register(&self, task_id: &str) {
        let mut statuses = self.statuses.write().await;
        statuses.insert(task_id.to_string(), TaskRecord::processing());
    }

    pub async fn status(&self, task_id: &str) -> Option<TaskStatus> {
        let statuses = self.statuses.read().await;
        statuses.get(task_id).map(|r| r.status.clone())
    }

    pub async fn result(&self, task_id: &str) -> Option<TaskResult> {
        let results = self.results.read().await;
        results.get(task_id).cloned()
    }

    pub async fn complete(&self, task_id: &str, result: PredictionResult) -> bool {
        self.finish(task_id, TaskStatus::Completed, TaskResult::Completed(result))
            .await
    }

    pub async fn fail(&self, task_id: &str, detail: String) -> bool {
        let result = TaskResult::failed(detail.clone());
        self.finish(task_id, TaskStatus::Failed(detail), result).await
    }

    /// Move a task to its terminal state. Status first, then result.
    ///
    /// Returns `false` when the task is unknown or already terminal; the
    /// existing entries are left untouched in that case.
    async fn finish(&self, task_id: &str, status: TaskStatus, result: TaskResult) -> bool {
        {
            let mut statuses = self.statuses.write().await;
            match statuses.get_mut(task_id) {
                Some(record) if !record.status.is_terminal() => {
                    record.status = status;
                    record.finished_at = Some(Utc::now());
                }
                Some(record) => {
                    warn!(task_id, status = %record.status, "task already finished, ignoring");
                    return false;
                }
                None => {
                    warn!(task_id, "finishing a task that was never registered");
                    return false;
                }
            }
        }

        let mut results = self.results.write().await;
        results.insert(task_id.to_string(), result);
        true
    }

    /// Drop tasks that finished before `cutoff`, result first, then status.
    /// A task whose result is not yet published is kept.
    pub async fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let expired: Vec<String> = {
            let statuses = self.statuses.read().await;
            statuses
                .iter()
                .filter(|(_, r)| r.finished_at.is_some_and(|t| t < cutoff))
                .map(|(id, _)| id.clone())
                .collect()
        };
        if expired.is_empty() {
            return 0;
        }

        let evicted: Vec<String> = {
            let mut results = self.results.write().await;
            expired
                .into_iter()
                .filter(|id| results.remove(id).is_some())
                .collect()
        };

        let mut statuses = self.statuses.write().await;
        for id in &evicted {
            statuses.remove(id);
        }
        debug!(evicted = evicted.len(), "evicted finished tasks");
        evicted.len()
    }

    pub async fn stats(&self) -> TaskStats {
        let statuses = self.statuses.read().await;
        let mut stats = TaskStats::default();
        for record in statuses.values() {
            match record.status {
                TaskStatus::Processing => stats.processing += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }

    pub async fn len(&self) -> usize {
        self.statuses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.statuses.read().await.is_empty()
    }
}
