//! Catalog management and product field operations.

use crate::change::ChangeEvent;
use crate::config::CatalogConfig;
use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use prodfield_core::{
    CategorizedFields, FieldCategory, FieldDescriptor, FieldSource, FieldType, SourceError,
    WriteOutcome, categorize, humanize,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use slug::slugify;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Directory name for prodfield configuration.
const PRODFIELD_DIR: &str = ".prodfield";
/// Configuration file name.
const CONFIG_FILE: &str = "config.yml";
/// Products directory name.
const PRODUCTS_DIR: &str = "catalog/products";
/// Record file name within a product directory.
const PRODUCT_FILE: &str = "product.yml";
/// Change log file name within a product directory.
const CHANGES_FILE: &str = "changes.ndjson";

/// Post statuses the catalog accepts.
const KNOWN_STATUSES: &[&str] = &["publish", "draft", "pending", "private"];

/// Field names the catalog refuses to write.
const READONLY_FIELDS: &[&str] = &["ID", "post_date", "post_modified", "_edit_lock", "_edit_last"];

/// Timestamp rendering used for `post_date` / `post_modified`.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A product record as stored in `product.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Numeric product id.
    pub id: u64,

    /// Product title.
    pub post_title: String,

    /// Post status (e.g. "publish", "draft").
    pub post_status: String,

    /// URL slug, derived from the title.
    pub post_name: String,

    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_content: Option<String>,

    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_excerpt: Option<String>,

    /// Creation timestamp (ISO 8601 UTC).
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (ISO 8601 UTC).
    pub updated_at: DateTime<Utc>,

    /// Commerce, SEO, ACF and miscellaneous metadata.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,

    /// Taxonomy assignments (taxonomy name to term list).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub terms: Map<String, Value>,
}

/// A filesystem-backed product catalog.
///
/// Products live under `catalog/products/<id>/` as a YAML record plus an
/// append-only change log. Reads go through a per-id record cache which is
/// invalidated as the last step of every write.
#[derive(Debug)]
pub struct Catalog {
    /// Root path of the catalog.
    root: PathBuf,
    /// Catalog configuration.
    config: CatalogConfig,
    /// Record read cache, keyed by product id.
    cache: RefCell<HashMap<u64, ProductRecord>>,
}

impl Catalog {
    /// Initialize a new catalog at the given path.
    ///
    /// # Errors
    /// Returns error if a catalog already exists there or IO fails.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let prodfield_dir = root.join(PRODFIELD_DIR);

        if prodfield_dir.exists() {
            return Err(StoreError::CatalogExists(root));
        }

        fs::create_dir_all(&prodfield_dir)?;
        fs::create_dir_all(root.join(PRODUCTS_DIR))?;

        let config = CatalogConfig {
            catalog_id: Uuid::new_v4(),
            ..CatalogConfig::default()
        };
        let config_content = serde_yaml::to_string(&config)?;
        fs::write(prodfield_dir.join(CONFIG_FILE), config_content)?;

        info!(path = %root.display(), "Initialized catalog");

        Ok(Self {
            root,
            config,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Open an existing catalog at the given path.
    ///
    /// # Errors
    /// Returns error if no catalog exists there or the config is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config_path = root.join(PRODFIELD_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(StoreError::CatalogNotFound(root));
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: CatalogConfig = serde_yaml::from_str(&config_content)?;

        debug!(path = %root.display(), "Opened catalog");

        Ok(Self {
            root,
            config,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Get the catalog root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Register terms for a taxonomy, creating the taxonomy if needed.
    ///
    /// # Errors
    /// Returns error if persisting the config fails.
    pub fn register_terms(
        &mut self,
        taxonomy: impl Into<String>,
        terms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        let entry = self.config.taxonomies.entry(taxonomy.into()).or_default();
        for term in terms {
            let term = term.into();
            if !entry.contains(&term) {
                entry.push(term);
            }
        }
        self.save_config()
    }

    /// Register a field as backed by the structured custom-field system.
    ///
    /// # Errors
    /// Returns error if persisting the config fails.
    pub fn register_acf_field(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.config.acf_fields.contains(&name) {
            self.config.acf_fields.push(name);
        }
        self.save_config()
    }

    /// Create a new product with the configured default status.
    ///
    /// # Errors
    /// Returns error if IO fails.
    pub fn create_product(&self, title: impl Into<String>) -> Result<ProductRecord> {
        let title = title.into();
        let id = self.next_id()?;
        let now = Utc::now();

        let mut meta = Map::new();
        meta.insert("_edit_lock".to_string(), json!(format!("{}:1", now.timestamp())));

        let record = ProductRecord {
            id,
            post_name: slugify(&title),
            post_title: title.clone(),
            post_status: self.config.defaults.status.clone(),
            post_content: None,
            post_excerpt: None,
            created_at: now,
            updated_at: now,
            meta,
            terms: Map::new(),
        };

        let product_dir = self.product_dir(id);
        fs::create_dir_all(&product_dir)?;
        self.write_record(&record)?;
        self.append_change(id, &ChangeEvent::new("post_title", None, json!(title)))?;

        info!(id, title = %record.post_title, "Created product");

        Ok(record)
    }

    /// Get a product record by id, reading through the cache.
    ///
    /// # Errors
    /// Returns error if the product doesn't exist or its record is invalid.
    pub fn get_product(&self, id: u64) -> Result<ProductRecord> {
        if let Some(record) = self.cache.borrow().get(&id) {
            debug!(id, "Record cache hit");
            return Ok(record.clone());
        }

        let record = self.read_record(id)?;
        self.cache.borrow_mut().insert(id, record.clone());
        Ok(record)
    }

    /// List all products, most recently updated first.
    ///
    /// # Errors
    /// Returns error if the products directory cannot be read.
    pub fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let products_dir = self.products_dir();
        if !products_dir.exists() {
            return Ok(Vec::new());
        }

        let mut products = Vec::new();

        for entry in fs::read_dir(&products_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let Some(id) = entry.file_name().to_str().and_then(|name| name.parse::<u64>().ok())
            else {
                continue;
            };

            match self.read_record(id) {
                Ok(record) => products.push(record),
                Err(e) => {
                    debug!(id, error = %e, "Failed to read product, skipping");
                }
            }
        }

        products.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(products)
    }

    /// Append a change entry to a product's change log.
    ///
    /// # Errors
    /// Returns error if IO or serialization fails.
    pub fn append_change(&self, id: u64, change: &ChangeEvent) -> Result<()> {
        let changes_path = self.product_dir(id).join(CHANGES_FILE);

        let mut file = OpenOptions::new().create(true).append(true).open(&changes_path)?;

        let json_line = serde_json::to_string(change)?;
        writeln!(file, "{json_line}")?;

        debug!(id, field = %change.field, "Appended change");

        Ok(())
    }

    /// Read a product's change log, optionally filtered by time.
    ///
    /// # Errors
    /// Returns error if the product doesn't exist or the log is invalid.
    pub fn read_changes(&self, id: u64, since: Option<DateTime<Utc>>) -> Result<Vec<ChangeEvent>> {
        if !self.product_dir(id).exists() {
            return Err(StoreError::ProductNotFound(id));
        }

        let changes_path = self.product_dir(id).join(CHANGES_FILE);
        if !changes_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&changes_path)?;
        let reader = BufReader::new(file);
        let mut changes = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let change: ChangeEvent = serde_json::from_str(&line)?;

            if since.is_none_or(|s| change.timestamp >= s) {
                changes.push(change);
            }
        }

        Ok(changes)
    }

    /// Build the categorized view of a record.
    #[must_use]
    pub fn categorized(&self, record: &ProductRecord) -> CategorizedFields {
        let mut fields = CategorizedFields::new();
        for (name, value) in Self::flat_view(record) {
            let category = categorize(&name, self.config.is_acf_field(&name));
            fields.insert(category, name, value);
        }
        fields
    }

    // Private helpers

    fn products_dir(&self) -> PathBuf {
        self.root.join(PRODUCTS_DIR)
    }

    fn product_dir(&self, id: u64) -> PathBuf {
        self.products_dir().join(id.to_string())
    }

    /// Allocate the next free product id.
    fn next_id(&self) -> Result<u64> {
        let products_dir = self.products_dir();
        if !products_dir.exists() {
            return Ok(1);
        }

        let mut max_id = 0;
        for entry in fs::read_dir(&products_dir)? {
            let entry = entry?;
            if let Some(id) = entry.file_name().to_str().and_then(|name| name.parse::<u64>().ok())
            {
                max_id = max_id.max(id);
            }
        }
        Ok(max_id + 1)
    }

    fn read_record(&self, id: u64) -> Result<ProductRecord> {
        let record_path = self.product_dir(id).join(PRODUCT_FILE);
        if !record_path.exists() {
            return Err(StoreError::ProductNotFound(id));
        }

        let content = fs::read_to_string(&record_path)?;
        let record: ProductRecord = serde_yaml::from_str(&content)?;
        Ok(record)
    }

    fn write_record(&self, record: &ProductRecord) -> Result<()> {
        let record_path = self.product_dir(record.id).join(PRODUCT_FILE);
        let content = serde_yaml::to_string(record)?;
        fs::write(&record_path, content)?;
        Ok(())
    }

    fn save_config(&self) -> Result<()> {
        let config_path = self.root.join(PRODFIELD_DIR).join(CONFIG_FILE);
        let content = serde_yaml::to_string(&self.config)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    fn persist_write(&self, record: &ProductRecord, changes: &[ChangeEvent]) -> Result<()> {
        self.write_record(record)?;
        for change in changes {
            self.append_change(record.id, change)?;
        }
        Ok(())
    }

    /// Explode a record into the flat name-to-value view fetch categorizes.
    fn flat_view(record: &ProductRecord) -> Map<String, Value> {
        let mut flat = Map::new();
        flat.insert("ID".to_string(), json!(record.id));
        flat.insert("post_title".to_string(), json!(record.post_title));
        flat.insert("post_status".to_string(), json!(record.post_status));
        flat.insert("post_name".to_string(), json!(record.post_name));
        if let Some(content) = &record.post_content {
            flat.insert("post_content".to_string(), json!(content));
        }
        if let Some(excerpt) = &record.post_excerpt {
            flat.insert("post_excerpt".to_string(), json!(excerpt));
        }
        flat.insert(
            "post_date".to_string(),
            json!(record.created_at.format(DATE_FORMAT).to_string()),
        );
        flat.insert(
            "post_modified".to_string(),
            json!(record.updated_at.format(DATE_FORMAT).to_string()),
        );
        for (name, value) in &record.meta {
            flat.insert(name.clone(), value.clone());
        }
        for (name, value) in &record.terms {
            flat.insert(name.clone(), value.clone());
        }
        flat
    }

    /// Apply one field to a record; returns the old value for the change
    /// log, or a message describing why the field was rejected.
    fn apply_field(
        &self,
        record: &mut ProductRecord,
        name: &str,
        value: &Value,
    ) -> std::result::Result<Option<Value>, String> {
        if READONLY_FIELDS.contains(&name) {
            return Err(format!("read-only field: {name}"));
        }

        match name {
            "post_title" => {
                let text = value_text(value)?;
                let old = std::mem::replace(&mut record.post_title, text);
                Ok(Some(json!(old)))
            }
            "post_status" => {
                let text = value_text(value)?;
                if !KNOWN_STATUSES.contains(&text.as_str()) {
                    return Err(format!("unknown status: {text}"));
                }
                let old = std::mem::replace(&mut record.post_status, text);
                Ok(Some(json!(old)))
            }
            "post_name" => {
                let text = value_text(value)?;
                let old = std::mem::replace(&mut record.post_name, slugify(text));
                Ok(Some(json!(old)))
            }
            "post_content" => {
                let old = record.post_content.replace(value_text(value)?);
                Ok(old.map(|v| json!(v)))
            }
            "post_excerpt" => {
                let old = record.post_excerpt.replace(value_text(value)?);
                Ok(old.map(|v| json!(v)))
            }
            _ if categorize(name, false) == FieldCategory::Taxonomy => {
                let Some(known) = self.config.terms(name) else {
                    return Err(format!("unknown taxonomy: {name}"));
                };
                for term in term_list(value)? {
                    if !known.iter().any(|k| k == &term) {
                        return Err(format!("unknown term '{term}' in taxonomy '{name}'"));
                    }
                }
                Ok(record.terms.insert(name.to_string(), value.clone()))
            }
            _ => Ok(record.meta.insert(name.to_string(), value.clone())),
        }
    }
}

/// Accept a string or number as field text.
fn value_text(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected a text value, got {other}")),
    }
}

/// The terms a taxonomy write names.
fn term_list(value: &Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("expected a term name, got {other}")),
            })
            .collect(),
        other => Err(format!("expected a term list, got {other}")),
    }
}

/// Infer the descriptor type from a field's current value.
fn infer_type(value: &Value) -> FieldType {
    match value {
        Value::Number(_) => FieldType::Number,
        Value::Array(_) => FieldType::List,
        Value::String(s) if s == "yes" || s == "no" => FieldType::Flag,
        _ => FieldType::Text,
    }
}

impl FieldSource for Catalog {
    fn is_available(&self) -> bool {
        self.root.join(PRODFIELD_DIR).join(CONFIG_FILE).exists()
    }

    fn fetch(&self, id: u64) -> std::result::Result<CategorizedFields, SourceError> {
        let record = self.get_product(id).map_err(SourceError::from)?;
        Ok(self.categorized(&record))
    }

    fn write(
        &mut self,
        id: u64,
        fields: &Map<String, Value>,
    ) -> std::result::Result<WriteOutcome, SourceError> {
        // Writes always start from the on-disk record; the cache only serves fetches.
        let mut record = self.read_record(id).map_err(SourceError::from)?;

        let mut outcome = WriteOutcome::default();
        let mut changes = Vec::new();

        for (name, value) in fields {
            match self.apply_field(&mut record, name, value) {
                Ok(old) => {
                    outcome.record_ok(name.as_str());
                    changes.push(ChangeEvent::new(name.as_str(), old, value.clone()));
                }
                Err(message) => outcome.record_err(name.as_str(), message),
            }
        }

        let now = Utc::now();
        record.updated_at = now;
        record
            .meta
            .insert("_edit_lock".to_string(), json!(format!("{}:1", now.timestamp())));

        let persisted = self.persist_write(&record, &changes);

        // Cache invalidation is the write's final step, partial failure or not.
        self.cache.borrow_mut().remove(&id);
        persisted.map_err(SourceError::from)?;

        info!(
            id,
            updated = outcome.updated.len(),
            failed = outcome.errors.len(),
            "Wrote product fields"
        );

        Ok(outcome)
    }

    fn list_fields(
        &self,
        sample_id: u64,
    ) -> std::result::Result<BTreeMap<String, FieldDescriptor>, SourceError> {
        let fields = self.fetch(sample_id)?;

        let mut descriptors = BTreeMap::new();
        for category in FieldCategory::ALL {
            for (name, value) in fields.category(category) {
                descriptors.insert(
                    name.clone(),
                    FieldDescriptor {
                        key: name.clone(),
                        title: humanize(name),
                        category,
                        field_type: infer_type(value),
                        is_acf: self.config.is_acf_field(name),
                        is_readonly: READONLY_FIELDS.contains(&name.as_str()),
                    },
                );
            }
        }
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Catalog) {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();
        (tmp, catalog)
    }

    #[test]
    fn test_init_catalog() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();

        assert!(tmp.path().join(".prodfield/config.yml").exists());
        assert!(tmp.path().join("catalog/products").exists());
        assert_eq!(catalog.config().version, 1);
        assert!(!catalog.config().catalog_id.is_nil());
    }

    #[test]
    fn test_init_existing_fails() {
        let tmp = TempDir::new().unwrap();
        Catalog::init(tmp.path()).unwrap();

        let result = Catalog::init(tmp.path());
        assert!(matches!(result, Err(StoreError::CatalogExists(_))));
    }

    #[test]
    fn test_open_missing_fails() {
        let tmp = TempDir::new().unwrap();
        let result = Catalog::open(tmp.path());
        assert!(matches!(result, Err(StoreError::CatalogNotFound(_))));
    }

    #[test]
    fn test_create_and_get_product() {
        let (_tmp, catalog) = setup();

        let record = catalog.create_product("Linen Shirt").unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.post_name, "linen-shirt");
        assert_eq!(record.post_status, "draft");

        let fetched = catalog.get_product(1).unwrap();
        assert_eq!(fetched.post_title, "Linen Shirt");

        let second = catalog.create_product("Wool Coat").unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_list_products() {
        let (_tmp, catalog) = setup();

        catalog.create_product("Shirt").unwrap();
        catalog.create_product("Coat").unwrap();

        let products = catalog.list_products().unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_fetch_categorizes_fields() {
        let (_tmp, mut catalog) = setup();
        catalog.register_acf_field("fabric").unwrap();
        catalog.register_terms("product_cat", ["Shirts"]).unwrap();

        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("_sku".to_string(), json!("SH-1"));
        fields.insert("wpseo_title".to_string(), json!("Shirt | Shop"));
        fields.insert("fabric".to_string(), json!("linen"));
        fields.insert("product_cat".to_string(), json!(["Shirts"]));
        fields.insert("care_notes".to_string(), json!("wash cold"));
        let outcome = catalog.write(record.id, &fields).unwrap();
        assert!(outcome.is_clean());

        let view = catalog.fetch(record.id).unwrap();
        assert_eq!(view.get("_sku"), Some((FieldCategory::Core, &json!("SH-1"))));
        assert_eq!(
            view.get("wpseo_title"),
            Some((FieldCategory::Seo, &json!("Shirt | Shop")))
        );
        assert_eq!(view.get("fabric"), Some((FieldCategory::Acf, &json!("linen"))));
        assert_eq!(
            view.get("product_cat"),
            Some((FieldCategory::Taxonomy, &json!(["Shirts"])))
        );
        assert_eq!(
            view.get("care_notes"),
            Some((FieldCategory::Meta, &json!("wash cold")))
        );
        assert!(view.get("post_date").is_some());
        assert!(view.get("_edit_lock").is_some());
    }

    #[test]
    fn test_write_is_best_effort_per_field() {
        let (_tmp, mut catalog) = setup();
        catalog.register_terms("product_cat", ["Shirts"]).unwrap();

        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("post_title".to_string(), json!("Better Shirt"));
        fields.insert("product_cat".to_string(), json!(["Hats"]));
        fields.insert("color".to_string(), json!("red"));
        let outcome = catalog.write(record.id, &fields).unwrap();

        assert_eq!(outcome.updated.len(), 2);
        assert!(outcome.updated.contains(&"post_title".to_string()));
        assert!(outcome.updated.contains(&"color".to_string()));
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors["product_cat"].contains("unknown term"));

        // The successful fields persisted despite the failure.
        let fetched = catalog.get_product(record.id).unwrap();
        assert_eq!(fetched.post_title, "Better Shirt");
        assert_eq!(fetched.meta.get("color"), Some(&json!("red")));
        assert!(fetched.terms.get("product_cat").is_none());
    }

    #[test]
    fn test_readonly_and_unknown_taxonomy_rejected() {
        let (_tmp, mut catalog) = setup();
        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("ID".to_string(), json!(99));
        fields.insert("post_modified".to_string(), json!("2026-01-01 00:00:00"));
        fields.insert("pa_color".to_string(), json!(["red"]));
        let outcome = catalog.write(record.id, &fields).unwrap();

        assert!(outcome.updated.is_empty());
        assert!(outcome.errors["ID"].contains("read-only"));
        assert!(outcome.errors["post_modified"].contains("read-only"));
        assert!(outcome.errors["pa_color"].contains("unknown taxonomy"));
    }

    #[test]
    fn test_invalid_status_rejected() {
        let (_tmp, mut catalog) = setup();
        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("post_status".to_string(), json!("archived"));
        let outcome = catalog.write(record.id, &fields).unwrap();

        assert!(outcome.errors["post_status"].contains("unknown status"));
    }

    #[test]
    fn test_taxonomy_accepts_comma_separated_text() {
        let (_tmp, mut catalog) = setup();
        catalog.register_terms("product_tag", ["sale", "new"]).unwrap();
        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("product_tag".to_string(), json!("sale, new"));
        let outcome = catalog.write(record.id, &fields).unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_write_invalidates_cache() {
        let tmp = TempDir::new().unwrap();
        let reader = Catalog::init(tmp.path()).unwrap();
        let record = reader.create_product("Shirt").unwrap();

        // Warm the reader's cache, then mutate through a second handle.
        assert_eq!(reader.get_product(record.id).unwrap().post_title, "Shirt");

        let mut writer = Catalog::open(tmp.path()).unwrap();
        let mut fields = Map::new();
        fields.insert("post_title".to_string(), json!("Renamed"));
        writer.write(record.id, &fields).unwrap();

        // The reader's cache is stale until its own write invalidates it.
        assert_eq!(reader.get_product(record.id).unwrap().post_title, "Shirt");

        let mut reader = reader;
        let mut fields = Map::new();
        fields.insert("color".to_string(), json!("red"));
        reader.write(record.id, &fields).unwrap();

        assert_eq!(reader.get_product(record.id).unwrap().post_title, "Renamed");
    }

    #[test]
    fn test_write_records_changes() {
        let (_tmp, mut catalog) = setup();
        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("post_title".to_string(), json!("Better Shirt"));
        fields.insert("color".to_string(), json!("red"));
        catalog.write(record.id, &fields).unwrap();

        let changes = catalog.read_changes(record.id, None).unwrap();
        // Creation entry plus the two written fields.
        assert_eq!(changes.len(), 3);

        let title_change = changes
            .iter()
            .rfind(|c| c.field == "post_title")
            .unwrap();
        assert_eq!(title_change.old_value, Some(json!("Shirt")));
        assert_eq!(title_change.new_value, json!("Better Shirt"));

        let color_change = changes.iter().find(|c| c.field == "color").unwrap();
        assert_eq!(color_change.old_value, None);
    }

    #[test]
    fn test_read_changes_for_missing_product_fails() {
        let (_tmp, catalog) = setup();
        let result = catalog.read_changes(42, None);
        assert!(matches!(result, Err(StoreError::ProductNotFound(42))));
    }

    #[test]
    fn test_list_fields_descriptors() {
        let (_tmp, mut catalog) = setup();
        catalog.register_acf_field("fabric").unwrap();
        let record = catalog.create_product("Shirt").unwrap();

        let mut fields = Map::new();
        fields.insert("_featured".to_string(), json!("no"));
        fields.insert("fabric".to_string(), json!("linen"));
        catalog.write(record.id, &fields).unwrap();

        let descriptors = catalog.list_fields(record.id).unwrap();

        let id = &descriptors["ID"];
        assert!(id.is_readonly);
        assert_eq!(id.field_type, FieldType::Number);

        let featured = &descriptors["_featured"];
        assert_eq!(featured.field_type, FieldType::Flag);
        assert_eq!(featured.title, "Featured");

        let fabric = &descriptors["fabric"];
        assert!(fabric.is_acf);
        assert_eq!(fabric.category, FieldCategory::Acf);
    }
}
