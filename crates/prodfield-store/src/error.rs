//! Error types for the filesystem catalog backend.

use prodfield_core::SourceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Catalog not found at the specified path.
    #[error("catalog not found at '{0}'")]
    CatalogNotFound(PathBuf),

    /// Catalog already exists.
    #[error("catalog already exists at '{0}'")]
    CatalogExists(PathBuf),

    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(u64),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for SourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProductNotFound(id) => Self::NotFound(id),
            StoreError::CatalogNotFound(_) => Self::Unavailable(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}
