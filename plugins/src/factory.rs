use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use vintner_core::api::{
    AppConfig, ArtifactStore, ModelRepository, PredictionWorkflow, TaskCoordinator,
};

use crate::store::{HttpBlobStore, LocalDirStore};

/// Remote artifact source for `cfg.storage`, or `None` when disabled or unset.
///
/// `http://` and `https://` base URLs use the blob endpoint; anything else is
/// treated as a mirror directory (a `file://` prefix is accepted).
pub fn build_artifact_store(cfg: &AppConfig) -> Result<Option<Arc<dyn ArtifactStore>>> {
    let storage = &cfg.storage;
    let base_url = storage.base_url.trim();
    if !storage.enabled || base_url.is_empty() {
        return Ok(None);
    }

    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        let store = HttpBlobStore::new(
            base_url,
            &storage.container,
            &storage.sas_token,
            storage.timeout_ms,
        )?;
        return Ok(Some(Arc::new(store)));
    }

    let root = base_url.strip_prefix("file://").unwrap_or(base_url);
    let root = PathBuf::from(root).join(&storage.container);
    Ok(Some(Arc::new(LocalDirStore::new(root))))
}

pub fn build_model_repository(cfg: &AppConfig) -> Result<Arc<ModelRepository>> {
    let remote = build_artifact_store(cfg)?;
    Ok(Arc::new(ModelRepository::from_config(cfg, remote)))
}

pub fn build_workflow(cfg: &AppConfig) -> Result<Arc<PredictionWorkflow>> {
    let models = build_model_repository(cfg)?;
    Ok(Arc::new(PredictionWorkflow::new(
        models,
        cfg.model.features.clone(),
    )))
}

/// Coordinator wired to the prediction workflow.
pub fn build_coordinator(cfg: &AppConfig) -> Result<TaskCoordinator> {
    let workflow = build_workflow(cfg)?;
    Ok(TaskCoordinator::new(workflow, cfg.worker.max_workers))
}
