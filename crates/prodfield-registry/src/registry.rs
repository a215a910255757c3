//! Column registration and the provider's field source implementation.

use crate::error::{RegistryError, Result};
use prodfield_core::{
    CategorizedFields, FieldDescriptor, FieldSource, FieldType, SourceError, WriteOutcome,
    categorize, humanize,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Read callback: render a column's value from a raw row.
type ReadFn = Box<dyn Fn(&Map<String, Value>) -> Option<Value>>;

/// Write callback: apply a value to a raw row, or reject it with a message.
type WriteFn = Box<dyn Fn(&mut Map<String, Value>, &Value) -> std::result::Result<(), String>>;

/// A registered column: field identity plus read/write callbacks.
///
/// The default callbacks are a plain map get/insert under the column key;
/// custom callbacks cover derived or validated columns.
pub struct Column {
    key: String,
    title: String,
    field_type: FieldType,
    acf: bool,
    readonly: bool,
    read: ReadFn,
    write: WriteFn,
}

impl Column {
    /// Create a column with default passthrough callbacks and a title
    /// derived from the key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let read_key = key.clone();
        let write_key = key.clone();
        Self {
            title: humanize(&key),
            key,
            field_type: FieldType::Text,
            acf: false,
            readonly: false,
            read: Box::new(move |row| row.get(&read_key).cloned()),
            write: Box::new(move |row, value| {
                row.insert(write_key.clone(), value.clone());
                Ok(())
            }),
        }
    }

    /// Override the display title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Declare the value shape.
    #[must_use]
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Mark the column as backed by the structured custom-field system.
    #[must_use]
    pub fn acf(mut self) -> Self {
        self.acf = true;
        self
    }

    /// Reject all writes to this column.
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Replace the read callback.
    #[must_use]
    pub fn with_read(
        mut self,
        read: impl Fn(&Map<String, Value>) -> Option<Value> + 'static,
    ) -> Self {
        self.read = Box::new(read);
        self
    }

    /// Replace the write callback.
    #[must_use]
    pub fn with_write(
        mut self,
        write: impl Fn(&mut Map<String, Value>, &Value) -> std::result::Result<(), String> + 'static,
    ) -> Self {
        self.write = Box::new(write);
        self
    }

    /// The column key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            key: self.key.clone(),
            title: self.title.clone(),
            category: categorize(&self.key, self.acf),
            field_type: self.field_type,
            is_acf: self.acf,
            is_readonly: self.readonly,
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("field_type", &self.field_type)
            .field("acf", &self.acf)
            .field("readonly", &self.readonly)
            .finish_non_exhaustive()
    }
}

/// A named provider exposing registered columns over in-memory rows.
///
/// Only registered columns are visible: fetch renders each column's read
/// callback over the raw row, and writes to unregistered names fail per
/// field.
#[derive(Debug)]
pub struct ColumnProvider {
    name: String,
    columns: Vec<Column>,
    rows: BTreeMap<u64, Map<String, Value>>,
}

impl ColumnProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    /// The provider name (e.g. "product").
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a column.
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateColumn` if the key is taken.
    pub fn register(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.key == column.key) {
            return Err(RegistryError::DuplicateColumn(column.key));
        }
        debug!(provider = %self.name, key = %column.key, "Registered column");
        self.columns.push(column);
        Ok(())
    }

    /// Insert a raw row.
    ///
    /// # Errors
    /// Returns `RegistryError::RowExists` if the id is taken.
    pub fn insert_row(&mut self, id: u64, row: Map<String, Value>) -> Result<()> {
        if self.rows.contains_key(&id) {
            return Err(RegistryError::RowExists(id));
        }
        self.rows.insert(id, row);
        Ok(())
    }

    /// Borrow a raw row.
    #[must_use]
    pub fn row(&self, id: u64) -> Option<&Map<String, Value>> {
        self.rows.get(&id)
    }

    fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }
}

impl FieldSource for ColumnProvider {
    fn is_available(&self) -> bool {
        !self.columns.is_empty()
    }

    fn fetch(&self, id: u64) -> std::result::Result<CategorizedFields, SourceError> {
        let row = self.rows.get(&id).ok_or(SourceError::NotFound(id))?;

        let mut fields = CategorizedFields::new();
        for column in &self.columns {
            if let Some(value) = (column.read)(row) {
                let category = categorize(&column.key, column.acf);
                fields.insert(category, column.key.clone(), value);
            }
        }
        Ok(fields)
    }

    fn write(
        &mut self,
        id: u64,
        fields: &Map<String, Value>,
    ) -> std::result::Result<WriteOutcome, SourceError> {
        let row = self.rows.get_mut(&id).ok_or(SourceError::NotFound(id))?;

        let mut outcome = WriteOutcome::default();

        for (name, value) in fields {
            let Some(column) = self.columns.iter().find(|c| c.key == *name) else {
                outcome.record_err(name.as_str(), format!("unknown column: {name}"));
                continue;
            };
            if column.readonly {
                outcome.record_err(name.as_str(), format!("read-only column: {name}"));
                continue;
            }
            match (column.write)(row, value) {
                Ok(()) => outcome.record_ok(name.as_str()),
                Err(message) => outcome.record_err(name.as_str(), message),
            }
        }

        info!(
            provider = %self.name,
            id,
            updated = outcome.updated.len(),
            failed = outcome.errors.len(),
            "Wrote row fields"
        );

        Ok(outcome)
    }

    fn list_fields(
        &self,
        _sample_id: u64,
    ) -> std::result::Result<BTreeMap<String, FieldDescriptor>, SourceError> {
        Ok(self
            .columns
            .iter()
            .map(|column| (column.key.clone(), column.descriptor()))
            .collect())
    }
}
