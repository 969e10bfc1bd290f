//! Error types for cellmap operations

use crate::KeyType;
use std::fmt;
use thiserror::Error;

/// Value and key codec errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Negative value {value} cannot be encoded as {key_type}")]
    NegativeValueForUnsigned { key_type: KeyType, value: i64 },

    #[error("Unknown enumeration label: {label}")]
    UnknownEnumLabel { label: String },

    #[error("Label index {index} out of range for {labels} labels")]
    IndexOutOfRange { index: usize, labels: usize },

    #[error("Unable to decode a boolean from {len} bytes")]
    UndecodableBoolean { len: usize },

    #[error("Unable to decode a decimal: {reason}")]
    UndecodableDecimal { reason: String },

    #[error("Unable to decode serialized value: {reason}")]
    UndecodableBlob { reason: String },

    #[error("Invalid UTF-8: {reason}")]
    InvalidUtf8 { reason: String },

    #[error("Date out of range: {millis}ms since epoch")]
    DateOutOfRange { millis: i64 },
}

impl CodecError {
    /// Shorthand for a value/type mismatch.
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// A byte length inconsistent with the declared width of `what`.
    pub fn invalid_width(what: impl fmt::Display, expected: &str, got: usize) -> Self {
        CodecError::TypeMismatch {
            expected: format!("{} bytes for {}", expected, what),
            found: format!("{} bytes", got),
        }
    }
}

/// Mapping model and registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Mapping \"{mapping}\" already exists for table \"{table}\"")]
    AlreadyExists { table: String, mapping: String },

    #[error("Mapping \"{mapping}\" does not exist for table \"{table}\"")]
    NotFound { table: String, mapping: String },

    #[error("Column {family},{qualifier} is already mapped")]
    DuplicateColumn { family: String, qualifier: String },

    #[error("Column alias \"{alias}\" has the same name as the table key")]
    AliasMatchesKey { alias: String },

    #[error("No mapped column with alias \"{alias}\"")]
    UnknownAlias { alias: String },

    #[error("Unknown column type: \"{type_name}\"")]
    UnknownType { type_name: String },

    #[error("Unknown key type: \"{type_name}\"")]
    UnknownKeyType { type_name: String },

    #[error("Indexed column {alias} must declare at least one label")]
    MissingLabels { alias: String },

    #[error("Invalid {field} \"{value}\": {reason}")]
    InvalidName {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed registry row \"{row}\": {reason}")]
    MalformedRegistryRow { row: String, reason: String },

    #[error("Mapping table \"{table}\" already exists")]
    RegistryTableExists { table: String },
}

/// Errors surfaced by the store administrative shim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    #[error("Table already exists: {table}")]
    TableExists { table: String },

    #[error("Table is disabled: {table}")]
    TableDisabled { table: String },

    #[error("Column family {family} does not exist in table {table}")]
    UnknownFamily { table: String, family: String },

    #[error("Store backend error: {reason}")]
    Backend { reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all cellmap errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CellmapError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for cellmap operations.
pub type CellmapResult<T> = Result<T, CellmapError>;

/// Result type alias for the pure codec layer.
pub type CodecResult<T> = Result<T, CodecError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display_negative_unsigned() {
        let err = CodecError::NegativeValueForUnsigned {
            key_type: KeyType::UnsignedInteger,
            value: -5,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("-5"));
        assert!(msg.contains("UnsignedInteger"));
    }

    #[test]
    fn test_mapping_error_display_not_found() {
        let err = MappingError::NotFound {
            table: "orders".to_string(),
            mapping: "default".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Mapping \"default\" does not exist for table \"orders\""
        );
    }

    #[test]
    fn test_master_error_from_store_error() {
        let err: CellmapError = StoreError::TableNotFound {
            table: "t".to_string(),
        }
        .into();
        assert!(matches!(err, CellmapError::Store(StoreError::TableNotFound { .. })));
        assert!(err.to_string().starts_with("Store error:"));
    }

    #[test]
    fn test_invalid_width_is_a_type_mismatch() {
        let err = CodecError::invalid_width(crate::ColumnType::Float, "4 or 8", 3);
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "Type mismatch: expected 4 or 8 bytes for Float, got 3 bytes"
        );
    }
}
