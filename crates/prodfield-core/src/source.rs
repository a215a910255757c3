//! Field source contract.

use crate::error::SourceError;
use crate::fields::{CategorizedFields, FieldDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Outcome of a best-effort batch write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Names written successfully, in write order.
    pub updated: Vec<String>,

    /// Per-field failures, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

impl WriteOutcome {
    /// Record a successful field write.
    pub fn record_ok(&mut self, name: impl Into<String>) {
        self.updated.push(name.into());
    }

    /// Record a per-field failure.
    pub fn record_err(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(name.into(), message.into());
    }

    /// Whether every field was written.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A backing store for product fields.
///
/// Implementations resolve product ids to categorized field maps and accept
/// flat maps back. Writes are best-effort per field: one field's rejection
/// lands in the outcome's error map and never aborts the batch. Anything
/// unexpected during a single field's write becomes a per-field message, not
/// a propagated error.
pub trait FieldSource {
    /// Whether the backend can serve requests at all.
    ///
    /// `false` means "cannot serve this request", not a retryable fault.
    fn is_available(&self) -> bool;

    /// Read all fields of a product, categorized.
    fn fetch(&self, id: u64) -> Result<CategorizedFields, SourceError>;

    /// Write a flat field map.
    ///
    /// Must invalidate any product-level cache as its last step, after all
    /// field writes attempt completion, regardless of partial failure.
    fn write(&mut self, id: u64, fields: &Map<String, Value>) -> Result<WriteOutcome, SourceError>;

    /// Describe the fields this backend exposes, keyed by field name.
    ///
    /// Discovery only; not correctness-critical.
    fn list_fields(&self, sample_id: u64) -> Result<BTreeMap<String, FieldDescriptor>, SourceError>;
}
