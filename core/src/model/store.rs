use async_trait::async_trait;

/// Remote source for pipeline artifacts, consulted on a local cache miss.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the raw bytes of `artifact` (a file name such as
    /// `wine_quality_pipeline_0.1.0.json`).
    async fn fetch(&self, artifact: &str) -> anyhow::Result<Vec<u8>>;
}
