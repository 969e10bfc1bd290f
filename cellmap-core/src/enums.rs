//! Type vocabulary for keys and mapped columns

use crate::MappingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// KEY TYPES
// ============================================================================

/// Logical type of a mapping's row key.
///
/// `Date` and `UnsignedDate` both hold epoch milliseconds. The signed
/// variants (`Integer`, `Long`, `Date`) are stored with the sign bit flipped
/// so that byte order matches numeric order; the unsigned variants store the
/// raw big-endian value and reject negatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    String,
    Integer,
    UnsignedInteger,
    Long,
    UnsignedLong,
    Date,
    UnsignedDate,
}

impl KeyType {
    /// Every key type, in declaration order.
    pub const ALL: [KeyType; 7] = [
        KeyType::String,
        KeyType::Integer,
        KeyType::UnsignedInteger,
        KeyType::Long,
        KeyType::UnsignedLong,
        KeyType::Date,
        KeyType::UnsignedDate,
    ];

    /// Convert to the persisted type-name string.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            KeyType::String => "String",
            KeyType::Integer => "Integer",
            KeyType::UnsignedInteger => "UnsignedInteger",
            KeyType::Long => "Long",
            KeyType::UnsignedLong => "UnsignedLong",
            KeyType::Date => "Date",
            KeyType::UnsignedDate => "UnsignedDate",
        }
    }

    /// Parse from a persisted type-name string (case-insensitive).
    pub fn from_db_str(s: &str) -> Result<Self, MappingError> {
        KeyType::ALL
            .iter()
            .copied()
            .find(|t| t.as_db_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MappingError::UnknownKeyType {
                type_name: s.to_string(),
            })
    }

    /// Encoded width in bytes, or `None` for variable-length string keys.
    pub fn width(&self) -> Option<usize> {
        match self {
            KeyType::String => None,
            KeyType::Integer | KeyType::UnsignedInteger => Some(4),
            KeyType::Long | KeyType::UnsignedLong | KeyType::Date | KeyType::UnsignedDate => {
                Some(8)
            }
        }
    }

    /// Whether the encoding assumes non-negative values.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            KeyType::UnsignedInteger | KeyType::UnsignedLong | KeyType::UnsignedDate
        )
    }

    /// Whether key values are instants.
    pub fn is_date(&self) -> bool {
        matches!(self, KeyType::Date | KeyType::UnsignedDate)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for KeyType {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// Logical type of an ordinary mapped column.
///
/// Integer and floating columns carry their width separately (see
/// `ColumnDescriptor::is_wide`): `Integer` is 32-bit or 64-bit ("Long"),
/// `Float` is 32-bit or 64-bit ("Double").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    /// String restricted to a fixed, ordered label set
    IndexedString,
    Integer,
    Float,
    Date,
    Boolean,
    BigDecimal,
    SerializedBlob,
    RawBinary,
}

impl ColumnType {
    /// Every column type, in declaration order.
    pub const ALL: [ColumnType; 9] = [
        ColumnType::String,
        ColumnType::IndexedString,
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Date,
        ColumnType::Boolean,
        ColumnType::BigDecimal,
        ColumnType::SerializedBlob,
        ColumnType::RawBinary,
    ];

    /// Name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::IndexedString => "IndexedString",
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Date => "Date",
            ColumnType::Boolean => "Boolean",
            ColumnType::BigDecimal => "BigDecimal",
            ColumnType::SerializedBlob => "SerializedBlob",
            ColumnType::RawBinary => "RawBinary",
        }
    }

    /// Whether the type has a narrow/wide variant.
    pub fn has_width(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
