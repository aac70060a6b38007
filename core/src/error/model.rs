use thiserror::Error;

/// Failures in the model access layer (artifact resolution and inference).
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact {artifact} not available locally or remotely: {reason}")]
    ArtifactMissing { artifact: String, reason: String },

    #[error("failed to download model artifact {artifact}: {source}")]
    Download {
        artifact: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("model artifact {artifact} could not be decoded: {source}")]
    Decode {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact is malformed: {0}")]
    InvalidArtifact(String),

    #[error("model artifact version {found} does not match expected {expected}")]
    VersionMismatch { expected: String, found: String },

    #[error("feature column '{0}' missing from prediction input")]
    MissingFeature(String),

    #[error("no rows left to predict after cleaning")]
    EmptyBatch,

    #[error("model io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    pub fn client_message(&self) -> String {
        match self {
            Self::ArtifactMissing { artifact, .. } | Self::Download { artifact, .. } => {
                format!("model artifact {artifact} is unavailable")
            }
            Self::Decode { artifact, .. } => format!("model artifact {artifact} is corrupt"),
            Self::Io(_) => "model artifact could not be read".to_string(),
            other => other.to_string(),
        }
    }
}
