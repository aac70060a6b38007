use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinError;
use tracing::info;

use crate::dataset::{clean, load_dataset};
use crate::error::TaskError;
use crate::model::{predict, ModelRepository, PredictionResult};
use crate::schema::{validate, ValidatedBatch};

/// The work a task performs on its input file.
#[async_trait]
pub trait Workflow: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, input: &Path) -> Result<PredictionResult, TaskError>;
}

/// Synchronous front half of the pipeline: read, drop incomplete rows, type-check.
pub fn load_clean_validate(input: &Path) -> Result<ValidatedBatch, TaskError> {
    let raw = load_dataset(input)?;
    let cleaned = clean(raw);
    let batch = validate(&cleaned)?;
    Ok(batch)
}

/// load → clean → validate → predict against the configured artifact.
pub struct PredictionWorkflow {
    models: Arc<ModelRepository>,
    features: Arc<[String]>,
}

impl PredictionWorkflow {
    pub fn new(models: Arc<ModelRepository>, features: Vec<String>) -> Self {
        Self {
            models,
            features: features.into(),
        }
    }
}

fn join_failure(err: JoinError) -> TaskError {
    TaskError::Worker(err.to_string())
}

#[async_trait]
impl Workflow for PredictionWorkflow {
    fn name(&self) -> &str {
        "prediction"
    }

    async fn run(&self, input: &Path) -> Result<PredictionResult, TaskError> {
        let path = input.to_path_buf();
        let batch = tokio::task::spawn_blocking(move || load_clean_validate(&path))
            .await
            .map_err(join_failure)??;
        info!(rows = batch.len(), "Input data valid. Making predictions.");

        let pipeline = self.models.load_pipeline().await?;
        let features = self.features.clone();
        let version = self.models.version().to_string();
        let result = tokio::task::spawn_blocking(move || {
            predict(&pipeline, &batch, &features, &version)
        })
        .await
        .map_err(join_failure)??;

        Ok(result)
    }
}
