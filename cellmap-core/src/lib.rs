//! cellmap Core - Schema Mapping Types
//!
//! Pure data structures describing how typed, named row values map onto a
//! sorted key-value store's row keys and column-family/qualifier cells.
//! No I/O lives here; codecs and storage build on these types.

use chrono::{DateTime, Utc};

pub mod config;
pub mod descriptor;
pub mod enums;
pub mod error;
pub mod mapping;
pub mod row;
pub mod value;

pub use config::{RegistryConfig, DEFAULT_MAPPING_TABLE};
pub use descriptor::ColumnDescriptor;
pub use enums::{ColumnType, KeyType};
pub use error::{
    CellmapError, CellmapResult, CodecError, CodecResult, ConfigError, MappingError, StoreError,
};
pub use mapping::{Mapping, MappingBuilder};
pub use row::{FamilyCells, Row};
pub use value::CellValue;

/// Instant type for date keys and columns. Stored with millisecond precision.
pub type Timestamp = DateTime<Utc>;

/// Separator used in registry row keys (`table,mapping`) and column
/// qualifiers (`family,column,alias`).
pub const SEPARATOR: &str = ",";

/// Separator between families in a tuple mapping's family list.
pub const TUPLE_FAMILY_SEPARATOR: char = ':';
