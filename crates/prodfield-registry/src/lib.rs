//! Column registry backend for prodfield.
//!
//! The analog of a spreadsheet-style column registry: fields are declared
//! as columns with identity metadata and read/write callbacks over raw
//! rows. `ColumnProvider` implements `prodfield_core::FieldSource`, so the
//! same `ProductAdapter` that serves the filesystem catalog serves this
//! backend unchanged.

pub mod error;
pub mod registry;

pub use error::{RegistryError, Result};
pub use registry::{Column, ColumnProvider};
