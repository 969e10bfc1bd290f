//! cellmap Registry - Persisted Mapping Definitions
//!
//! Stores [`Mapping`](cellmap_core::Mapping)s as rows of a dedicated table
//! (`pentaho_mappings` by default) reached through
//! [`StoreAdmin`](cellmap_storage::StoreAdmin). See [`layout`] for the row
//! format.

pub mod fixtures;
pub mod layout;
mod registry;

pub use fixtures::{create_sample_table, sample_mapping};
pub use layout::{COLUMNS_FAMILY, KEY_FAMILY};
pub use registry::MappingRegistry;
