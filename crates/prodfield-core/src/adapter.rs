//! Generic product adapter over a field source.
//!
//! One implementation serves every backend: the adapter owns a
//! [`FieldSource`] and layers availability checks, side-tagged fetch errors,
//! and the compare/clone flows on top of it.

use crate::clone::clone_fields;
use crate::diff::{FieldDifference, diff_fields};
use crate::error::{AdapterError, Result, Side, SourceError};
use crate::fields::{CategorizedFields, FieldDescriptor};
use crate::source::{FieldSource, WriteOutcome};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Result of comparing two products field by field.
#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    /// Number of differing fields.
    pub differences_count: usize,

    /// The differences, grouped by category in fixed order.
    pub differences: Vec<FieldDifference>,
}

/// Result of cloning one product's fields onto another.
#[derive(Debug, Clone, Serialize)]
pub struct CloneReport {
    /// Number of fields written successfully.
    pub fields_copied: usize,

    /// Names of the fields that were written.
    pub fields: Vec<String>,

    /// Names that failed to write.
    pub skipped: Vec<String>,

    /// Per-field error messages, keyed by field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

/// Uniform read/write/compare/clone surface over any [`FieldSource`].
#[derive(Debug)]
pub struct ProductAdapter<S> {
    source: S,
}

impl<S: FieldSource> ProductAdapter<S> {
    /// Wrap a field source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the adapter, returning the source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Whether the backend can serve requests.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }

    /// Read a product's fields, categorized.
    ///
    /// # Errors
    /// Returns an error if the backend is unavailable or the id does not
    /// resolve.
    pub fn product_fields(&self, id: u64) -> Result<CategorizedFields> {
        self.ensure_available()?;
        Ok(self.source.fetch(id)?)
    }

    /// Write a flat field map to a product, best-effort per field.
    ///
    /// # Errors
    /// Returns an error only for entity-level failures; per-field failures
    /// land in the outcome's error map.
    pub fn set_product_fields(
        &mut self,
        id: u64,
        fields: &Map<String, Value>,
    ) -> Result<WriteOutcome> {
        self.ensure_available()?;
        Ok(self.source.write(id, fields)?)
    }

    /// Compare two products field by field.
    ///
    /// # Errors
    /// A failed fetch aborts the comparison and reports which side failed;
    /// no partial diff is produced.
    pub fn compare_products(&self, source_id: u64, target_id: u64) -> Result<CompareReport> {
        self.ensure_available()?;
        let source = self.fetch_side(Side::Source, source_id)?;
        let target = self.fetch_side(Side::Target, target_id)?;

        let differences = diff_fields(&source, &target);
        Ok(CompareReport {
            differences_count: differences.len(),
            differences,
        })
    }

    /// Copy one product's fields onto another.
    ///
    /// The source is fetched and reduced to a flat payload via
    /// [`clone_fields`]; the target is fetched first so a bad id fails with
    /// a side-tagged error before anything is written.
    ///
    /// # Errors
    /// Entity-level failures abort the clone; per-field write failures are
    /// reported in the `skipped`/`errors` fields of the report.
    pub fn clone_product_fields(
        &mut self,
        source_id: u64,
        target_id: u64,
        overrides: &Map<String, Value>,
        exclude: &[String],
    ) -> Result<CloneReport> {
        self.ensure_available()?;
        let source = self.fetch_side(Side::Source, source_id)?;
        self.fetch_side(Side::Target, target_id)?;

        let payload = clone_fields(&source, overrides, exclude);
        let outcome = self.source.write(target_id, &payload)?;

        Ok(CloneReport {
            fields_copied: outcome.updated.len(),
            fields: outcome.updated,
            skipped: outcome.errors.keys().cloned().collect(),
            errors: outcome.errors,
        })
    }

    /// Describe the fields the backend exposes, keyed by name.
    ///
    /// # Errors
    /// Returns an error if the backend is unavailable or the sample id does
    /// not resolve.
    pub fn available_fields(&self, sample_id: u64) -> Result<BTreeMap<String, FieldDescriptor>> {
        self.ensure_available()?;
        Ok(self.source.list_fields(sample_id)?)
    }

    fn ensure_available(&self) -> Result<()> {
        if self.source.is_available() {
            Ok(())
        } else {
            Err(SourceError::Unavailable("field source reports unavailable".to_string()).into())
        }
    }

    fn fetch_side(&self, side: Side, id: u64) -> Result<CategorizedFields> {
        self.source
            .fetch(id)
            .map_err(|source| AdapterError::SideFetch { side, id, source })
    }
}
