//! Error types for prodfield-core.

use thiserror::Error;

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Entity-level errors a field source can report.
///
/// Per-field write failures are not errors at this level; they accumulate in
/// [`crate::source::WriteOutcome::errors`] instead.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Product id did not resolve.
    #[error("product not found: {0}")]
    NotFound(u64),

    /// Required backend is missing or unusable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Which side of a two-product operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Errors returned by [`crate::adapter::ProductAdapter`] operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Fetching one side of a compare/clone failed.
    #[error("{side} product {id}: {source}")]
    SideFetch {
        side: Side,
        id: u64,
        #[source]
        source: SourceError,
    },

    /// Backend failure outside a two-sided operation.
    #[error(transparent)]
    Source(#[from] SourceError),
}
