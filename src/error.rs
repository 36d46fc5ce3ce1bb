use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading a catalog or position table.
///
/// The aggregators never produce these: they only run on data that has
/// already been loaded, and treat an empty catalog as "nothing matches".
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("network error after retries for {url}: {message}")]
    RetriesExhausted { url: String, message: String },
}
