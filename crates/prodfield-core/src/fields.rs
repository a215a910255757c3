//! Categorized product field model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bucket a field name resolves to.
///
/// Every field of a product lands in exactly one category; categorization is
/// a pure function of the name (see [`crate::normalize::categorize`]), so a
/// name can never appear in two buckets of the same map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    /// Core post and commerce fields (title, status, sku, prices, ...).
    Core,
    /// Fields backed by a structured custom-field system.
    Acf,
    /// SEO plugin metadata.
    Seo,
    /// Taxonomy-derived fields (categories, tags, attributes).
    Taxonomy,
    /// Everything else: miscellaneous post metadata.
    Meta,
}

impl FieldCategory {
    /// All categories in their fixed enumeration order.
    ///
    /// Diff output and clone flattening both walk this order.
    pub const ALL: [Self; 5] = [Self::Core, Self::Acf, Self::Seo, Self::Taxonomy, Self::Meta];
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Acf => write!(f, "acf"),
            Self::Seo => write!(f, "seo"),
            Self::Taxonomy => write!(f, "taxonomy"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

/// Value shape a field exposes, for discovery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-form text.
    Text,
    /// Numeric value.
    Number,
    /// `"yes"` / `"no"` toggle.
    Flag,
    /// Ordered list of values.
    List,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Flag => write!(f, "flag"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Metadata describing one field's identity, for discovery/UI population.
///
/// Derived on demand from a backend; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Raw field name.
    pub key: String,

    /// Human-readable title.
    pub title: String,

    /// Category the key resolves to.
    pub category: FieldCategory,

    /// Value shape.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether a structured custom-field system backs this field.
    pub is_acf: bool,

    /// Whether writes to this field are rejected.
    pub is_readonly: bool,
}

/// A product's fields, grouped by category.
///
/// Each bucket is a `serde_json::Map`, which iterates in a stable order, so
/// diff and clone output is deterministic for a given input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedFields {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub core: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub acf: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub seo: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub taxonomy: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl CategorizedFields {
    /// Create an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the bucket for a category.
    #[must_use]
    pub fn category(&self, category: FieldCategory) -> &Map<String, Value> {
        match category {
            FieldCategory::Core => &self.core,
            FieldCategory::Acf => &self.acf,
            FieldCategory::Seo => &self.seo,
            FieldCategory::Taxonomy => &self.taxonomy,
            FieldCategory::Meta => &self.meta,
        }
    }

    /// Mutably borrow the bucket for a category.
    pub fn category_mut(&mut self, category: FieldCategory) -> &mut Map<String, Value> {
        match category {
            FieldCategory::Core => &mut self.core,
            FieldCategory::Acf => &mut self.acf,
            FieldCategory::Seo => &mut self.seo,
            FieldCategory::Taxonomy => &mut self.taxonomy,
            FieldCategory::Meta => &mut self.meta,
        }
    }

    /// Insert a field into the given category's bucket.
    pub fn insert(
        &mut self,
        category: FieldCategory,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.category_mut(category).insert(name.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_field(
        mut self,
        category: FieldCategory,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(category, name, value);
        self
    }

    /// Look up a field by name across all categories.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<(FieldCategory, &Value)> {
        FieldCategory::ALL
            .iter()
            .find_map(|&category| self.category(category).get(name).map(|v| (category, v)))
    }

    /// Total number of fields across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        FieldCategory::ALL
            .iter()
            .map(|&category| self.category(category).len())
            .sum()
    }

    /// Whether no category holds any field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collapse all categories into one flat map, walking categories in
    /// their fixed order. Names are unique across categories, so no entry
    /// can shadow another.
    #[must_use]
    pub fn flatten(&self) -> Map<String, Value> {
        let mut flat = Map::new();
        for category in FieldCategory::ALL {
            for (name, value) in self.category(category) {
                flat.insert(name.clone(), value.clone());
            }
        }
        flat
    }
}
