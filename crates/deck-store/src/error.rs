use thiserror::Error;

/// Failures talking to the remote store. None are fatal: each is cleared by
/// retrying, re-authenticating, or fixing the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Missing credential, or the backend rejected it.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend was unreachable or answered with an error.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a body that is not a store document.
    #[error("malformed store document: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}
