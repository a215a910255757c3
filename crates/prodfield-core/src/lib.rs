//! prodfield-core: field categorization, diff and clone logic for product
//! field adapters.
//!
//! This crate provides:
//! - `CategorizedFields`: a product's fields grouped into the fixed
//!   `core | acf | seo | taxonomy | meta` buckets
//! - `categorize` / `humanize` / `flatten_value`: the field normalizer
//! - `diff_fields`: per-field comparison of two products
//! - `clone_fields`: the clone-with-overrides payload computation
//! - `FieldSource`: the capability trait concrete backends implement
//! - `ProductAdapter`: the uniform read/write/compare/clone surface over
//!   any field source

pub mod adapter;
pub mod clone;
pub mod diff;
pub mod error;
pub mod fields;
pub mod normalize;
pub mod source;

pub use adapter::{CloneReport, CompareReport, ProductAdapter};
pub use clone::{ALWAYS_EXCLUDE, clone_fields};
pub use diff::{FieldDifference, diff_fields};
pub use error::{AdapterError, Result, Side, SourceError};
pub use fields::{CategorizedFields, FieldCategory, FieldDescriptor, FieldType};
pub use normalize::{categorize, comparable_text, flatten_value, humanize, is_empty_value};
pub use source::{FieldSource, WriteOutcome};
