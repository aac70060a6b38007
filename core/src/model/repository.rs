use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::info;

use super::pipeline::Pipeline;
use super::store::ArtifactStore;
use crate::config::AppConfig;
use crate::error::ModelError;

/// Version stamped onto artifacts and prediction results.
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `{stem}_{version}.json`
pub fn artifact_file_name(stem: &str, version: &str) -> String {
    format!("{stem}_{version}.json")
}

/// Resolves the versioned pipeline artifact and caches it after the first
/// successful load. Failed loads are not cached, so a later task retries.
pub struct ModelRepository {
    dir: PathBuf,
    artifact: String,
    version: String,
    remote: Option<Arc<dyn ArtifactStore>>,
    cached: OnceCell<Arc<Pipeline>>,
}

impl ModelRepository {
    pub fn new(
        dir: impl Into<PathBuf>,
        stem: &str,
        version: &str,
        remote: Option<Arc<dyn ArtifactStore>>,
    ) -> Self {
        Self {
            dir: dir.into(),
            artifact: artifact_file_name(stem, version),
            version: version.to_string(),
            remote,
            cached: OnceCell::new(),
        }
    }

    pub fn from_config(cfg: &AppConfig, remote: Option<Arc<dyn ArtifactStore>>) -> Self {
        Self::new(
            &cfg.app.trained_model_dir,
            &cfg.app.pipeline_save_file,
            PACKAGE_VERSION,
            remote,
        )
    }

    pub fn artifact_name(&self) -> &str {
        &self.artifact
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(&self.artifact)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub async fn load_pipeline(&self) -> Result<Arc<Pipeline>, ModelError> {
        self.cached
            .get_or_try_init(|| self.load_uncached())
            .await
            .cloned()
    }

    async fn load_uncached(&self) -> Result<Arc<Pipeline>, ModelError> {
        let path = self.artifact_path();
        self.download_if_missing(&path).await?;

        info!("Loading model from {}", path.display());
        let bytes = tokio::fs::read(&path).await?;
        let pipeline: Pipeline =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::Decode {
                artifact: self.artifact.clone(),
                source,
            })?;

        if pipeline.version != self.version {
            return Err(ModelError::VersionMismatch {
                expected: self.version.clone(),
                found: pipeline.version,
            });
        }
        pipeline.check()?;

        info!(
            artifact = %self.artifact,
            trees = pipeline.forest.trees.len(),
            "Pipeline loaded"
        );
        Ok(Arc::new(pipeline))
    }

    async fn download_if_missing(&self, path: &Path) -> Result<(), ModelError> {
        if path.exists() {
            return Ok(());
        }

        let Some(remote) = self.remote.as_ref() else {
            return Err(ModelError::ArtifactMissing {
                artifact: self.artifact.clone(),
                reason: "not found locally and no remote store configured".to_string(),
            });
        };

        info!(
            store = remote.name(),
            artifact = %self.artifact,
            "Model not found locally. Downloading..."
        );
        let content = remote
            .fetch(&self.artifact)
            .await
            .map_err(|source| ModelError::Download {
                artifact: self.artifact.clone(),
                source,
            })?;
        info!("Downloaded artifact size: {} bytes", content.len());

        tokio::fs::create_dir_all(&self.dir).await?;
        // Write next to the target and rename so readers never see a partial file.
        let part = path.with_extension("json.part");
        let mut file = tokio::fs::File::create(&part).await?;
        file.write_all(&content).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&part, path).await?;

        info!("Model downloaded.");
        Ok(())
    }
}
