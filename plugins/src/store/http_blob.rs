use std::{error::Error as StdError, fmt};

use async_trait::async_trait;
use vintner_core::api::ArtifactStore;

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobHttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Status,
    Unknown,
}

impl BlobHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlobHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to the blob endpoint. The URL never carries the SAS token.
#[derive(Debug)]
pub struct BlobHttpError {
    kind: BlobHttpErrorKind,
    status: Option<u16>,
    url: String,
    message: String,
    source: Option<anyhow::Error>,
}

impl BlobHttpError {
    pub fn kind(&self) -> BlobHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            BlobHttpErrorKind::Timeout
        } else if err.is_connect() {
            BlobHttpErrorKind::Connect
        } else if err.is_request() {
            BlobHttpErrorKind::Request
        } else if err.is_body() {
            BlobHttpErrorKind::Body
        } else {
            BlobHttpErrorKind::Unknown
        };
        // reqwest includes the full URL (and so the token) in its message.
        let err = err.without_url();
        BlobHttpError {
            kind,
            status: err.status().map(|s| s.as_u16()),
            url,
            message: err.to_string(),
            source: Some(anyhow::Error::new(err)),
        }
    }

    fn status_error(status: u16, url: String, preview: String) -> Self {
        BlobHttpError {
            kind: BlobHttpErrorKind::Status,
            status: Some(status),
            url,
            message: preview,
            source: None,
        }
    }
}

impl fmt::Display for BlobHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        write!(f, " url={}: {}", self.url, self.message)
    }
}

impl StdError for BlobHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

fn preview_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}

/// Azure-blob-style store: `GET {base_url}/{container}/{artifact}?{sas_token}`.
#[derive(Clone)]
pub struct HttpBlobStore {
    http: reqwest::Client,
    container_url: String,
    sas_token: String,
}

impl HttpBlobStore {
    pub fn new(
        base_url: &str,
        container: &str,
        sas_token: &str,
        timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            container_url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                container.trim_matches('/')
            ),
            sas_token: sas_token.trim_start_matches('?').to_string(),
        })
    }

    /// Location of `artifact` without credentials, for logs and errors.
    pub fn blob_url(&self, artifact: &str) -> String {
        format!("{}/{}", self.container_url, artifact)
    }

    fn request_url(&self, artifact: &str) -> String {
        let url = self.blob_url(artifact);
        if self.sas_token.is_empty() {
            url
        } else {
            format!("{url}?{}", self.sas_token)
        }
    }
}

#[async_trait]
impl ArtifactStore for HttpBlobStore {
    fn name(&self) -> &str {
        "http-blob"
    }

    async fn fetch(&self, artifact: &str) -> anyhow::Result<Vec<u8>> {
        let url = self.blob_url(artifact);
        tracing::debug!(
            target: "vintner.storage",
            stage = "storage.http.fetch.in",
            url = %url
        );

        let resp = self
            .http
            .get(self.request_url(artifact))
            .send()
            .await
            .map_err(|err| BlobHttpError::from_reqwest(err, url.clone()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|err| BlobHttpError::from_reqwest(err, url.clone()))?;

        if !status.is_success() {
            let preview = preview_body(&body);
            return Err(BlobHttpError::status_error(status.as_u16(), url, preview).into());
        }

        tracing::debug!(
            target: "vintner.storage",
            stage = "storage.http.fetch.out",
            status = %status,
            bytes = body.len()
        );
        Ok(body.to_vec())
    }
}
