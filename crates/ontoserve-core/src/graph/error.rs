//! Graph store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a graph store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// Snapshot file could not be parsed.
    #[error("Snapshot error in {path}: {message}")]
    Snapshot { path: String, message: String },

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data violates the graph model.
    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}
