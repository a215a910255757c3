//! Catalog configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Catalog configuration stored in `.prodfield/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Stable identity of this catalog, minted at init.
    #[serde(default = "Uuid::nil")]
    pub catalog_id: Uuid,

    /// Default values for new products.
    #[serde(default)]
    pub defaults: ProductDefaults,

    /// Field names backed by the structured custom-field system.
    #[serde(default)]
    pub acf_fields: Vec<String>,

    /// Registered taxonomies and their known terms.
    #[serde(default = "default_taxonomies")]
    pub taxonomies: BTreeMap<String, Vec<String>>,
}

fn default_version() -> u32 {
    1
}

fn default_taxonomies() -> BTreeMap<String, Vec<String>> {
    let mut taxonomies = BTreeMap::new();
    taxonomies.insert("product_cat".to_string(), Vec::new());
    taxonomies.insert("product_tag".to_string(), Vec::new());
    taxonomies
}

/// Default values for new products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDefaults {
    /// Default post status for new products.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "draft".to_string()
}

impl Default for ProductDefaults {
    fn default() -> Self {
        Self {
            status: default_status(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            version: 1,
            catalog_id: Uuid::nil(),
            defaults: ProductDefaults::default(),
            acf_fields: Vec::new(),
            taxonomies: default_taxonomies(),
        }
    }
}

impl CatalogConfig {
    /// Whether the structured custom-field system backs this name.
    #[must_use]
    pub fn is_acf_field(&self, name: &str) -> bool {
        self.acf_fields.iter().any(|f| f == name)
    }

    /// Known terms for a taxonomy, if it is registered.
    #[must_use]
    pub fn terms(&self, taxonomy: &str) -> Option<&[String]> {
        self.taxonomies.get(taxonomy).map(Vec::as_slice)
    }
}
