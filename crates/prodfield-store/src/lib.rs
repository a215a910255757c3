//! Filesystem catalog backend for prodfield product storage.
//!
//! Stores products as per-id directories with:
//! - `product.yml`: the product record
//! - `changes.ndjson`: append-only field change log
//!
//! `Catalog` implements `prodfield_core::FieldSource`, so a
//! `ProductAdapter<Catalog>` serves the full read/write/compare/clone
//! surface against this store.

pub mod catalog;
pub mod change;
pub mod config;
pub mod error;

pub use catalog::{Catalog, ProductRecord};
pub use change::ChangeEvent;
pub use config::{CatalogConfig, ProductDefaults};
pub use error::{Result, StoreError};
