//! Errors surfaced by the query router.

use thiserror::Error;

/// Failure of a single query.
///
/// An unknown book name is deliberately absent: such references are dropped
/// by the parser and the rest of the query proceeds.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A direct lookup (commentary id, document path) found nothing.
    #[error("{0}")]
    NotFound(String),
    /// The request itself is unusable (missing fields, unsafe path).
    #[error("{0}")]
    InvalidRequest(String),
    /// A store or index failed; the whole request fails with it.
    #[error(transparent)]
    Adapter(#[from] anyhow::Error),
}

impl QueryError {
    /// Machine-readable code for error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::NotFound(_) => "not_found",
            QueryError::InvalidRequest(_) => "bad_request",
            QueryError::Adapter(_) => "internal",
        }
    }
}
