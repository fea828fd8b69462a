use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain a response body for one window.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Index service returned {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Admission gate error: {0}")]
    Admission(String),
}

/// A response line that cannot be accepted as an index record.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Line {line}: malformed record: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Line {line}: path '{path}' is shorter than the minimum length")]
    PathTooShort { line: usize, path: String },
}

impl RecordError {
    /// 1-based line number within the response body.
    pub fn line(&self) -> usize {
        match self {
            Self::Json { line, .. } | Self::PathTooShort { line, .. } => *line,
        }
    }
}

#[async_trait]
pub trait IndexFetcher: Send + Sync {
    /// Returns the raw newline-delimited body served for `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
