use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use vintner_core::api::ArtifactStore;

/// Serves artifacts from a mirror directory laid out as `{root}/{container}/{artifact}`.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactStore for LocalDirStore {
    fn name(&self) -> &str {
        "local-dir"
    }

    async fn fetch(&self, artifact: &str) -> anyhow::Result<Vec<u8>> {
        // Artifact names are plain file names; anything else would escape the mirror.
        if artifact.contains(['/', '\\']) || artifact == ".." {
            anyhow::bail!("invalid artifact name {artifact:?}");
        }
        let path = self.root.join(artifact);
        tracing::debug!(target: "vintner.storage", path = %path.display(), "reading mirrored artifact");
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("artifact {artifact} not found in mirror"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.json"), b"{}").unwrap();
        let store = LocalDirStore::new(dir.path());
        assert_eq!(store.fetch("model.json").await.unwrap(), b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_missing_and_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path());
        assert!(store.fetch("absent.json").await.is_err());
        assert!(store.fetch("../etc/passwd").await.is_err());
    }
}
