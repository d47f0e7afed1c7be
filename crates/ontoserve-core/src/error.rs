//! Request-facing error taxonomy.

use thiserror::Error;

use crate::graph::StoreError;
use crate::search::IndexError;

/// Errors surfaced to the caller of a query operation.
///
/// Each is scoped to one request; none is fatal to the process.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed input or a request against an unusable submission.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown ontology, submission or class.
    #[error("{0}")]
    NotFound(String),

    /// The resource exists but may not be served.
    #[error("{0}")]
    Forbidden(String),

    /// The graph store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search index failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl QueryError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        QueryError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        QueryError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        QueryError::Forbidden(message.into())
    }

    /// True for errors caused by the request rather than a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::BadRequest(_) | QueryError::NotFound(_) | QueryError::Forbidden(_)
        )
    }
}
