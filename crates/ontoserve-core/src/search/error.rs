//! Search index error types.

use thiserror::Error;

/// Errors raised by a search index backend.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Search index request failed: {0}")]
    Request(String),

    #[error("Search index returned error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse search index response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for IndexError {
    fn from(err: reqwest::Error) -> Self {
        IndexError::Request(err.to_string())
    }
}
