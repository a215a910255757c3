//! Error types for the column registry backend.

use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A column with this key is already registered.
    #[error("column already registered: {0}")]
    DuplicateColumn(String),

    /// A row with this id already exists.
    #[error("row already exists: {0}")]
    RowExists(u64),
}
