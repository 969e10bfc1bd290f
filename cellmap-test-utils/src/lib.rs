//! cellmap Test Utilities
//!
//! Shared test infrastructure for the cellmap workspace:
//! - Proptest generators for the mapping vocabulary and cell values
//! - Fixtures covering every column type
//! - Assertions for cellmap error variants

pub use cellmap_core::{
    CellValue, CellmapError, CellmapResult, CodecError, ColumnDescriptor, ColumnType, KeyType,
    Mapping, MappingError, StoreError, Timestamp,
};

use bigdecimal::BigDecimal;
use chrono::DateTime;
use std::str::FromStr;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for mapping types and values.

    use super::*;
    use proptest::prelude::*;

    // === Name Generators ===

    /// A separator-free identifier usable as table, family, qualifier or alias.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,9}"
    }

    /// A non-empty set of distinct labels.
    pub fn arb_labels() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set("[a-z]{1,6}", 1..6).prop_map(|set| set.into_iter().collect())
    }

    // === Enum Generators ===

    /// Generate a KeyType variant.
    pub fn arb_key_type() -> impl Strategy<Value = KeyType> {
        prop::sample::select(KeyType::ALL.to_vec())
    }

    /// Generate a ColumnType variant.
    pub fn arb_column_type() -> impl Strategy<Value = ColumnType> {
        prop::sample::select(ColumnType::ALL.to_vec())
    }

    /// Generate a Timestamp within roughly +/- 250 years of the epoch.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (-8_000_000_000_000i64..8_000_000_000_000i64)
            .prop_map(|millis| DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    // === Struct Generators ===

    /// Generate a valid ColumnDescriptor of any type and width.
    pub fn arb_descriptor() -> impl Strategy<Value = ColumnDescriptor> {
        (
            arb_name(),
            arb_name(),
            arb_name(),
            arb_column_type(),
            any::<bool>(),
            arb_labels(),
        )
            .prop_map(|(family, qualifier, alias, column_type, wide, labels)| {
                let descriptor = if column_type == ColumnType::IndexedString {
                    ColumnDescriptor::indexed(family, qualifier, alias, labels)
                } else {
                    ColumnDescriptor::new(family, qualifier, alias, column_type)
                        .map(|d| d.with_wide(wide))
                };
                descriptor.expect("generated descriptor is valid")
            })
    }

    /// Generate a value the given column can encode and decode losslessly.
    pub fn arb_value_for(column: &ColumnDescriptor) -> BoxedStrategy<CellValue> {
        match column.column_type() {
            ColumnType::String => ".{0,24}".prop_map(CellValue::String).boxed(),
            ColumnType::IndexedString => {
                let count = column.labels().map(<[String]>::len).unwrap_or(1);
                (0..count).prop_map(CellValue::Indexed).boxed()
            }
            ColumnType::Integer if column.is_wide() => any::<i64>().prop_map(CellValue::Integer).boxed(),
            ColumnType::Integer => any::<i32>().prop_map(CellValue::from).boxed(),
            ColumnType::Float if column.is_wide() => {
                (-1.0e15f64..1.0e15).prop_map(CellValue::Number).boxed()
            }
            ColumnType::Float => (-1.0e6f32..1.0e6)
                .prop_map(|v| CellValue::Number(f64::from(v)))
                .boxed(),
            ColumnType::Date => arb_timestamp().prop_map(CellValue::Date).boxed(),
            ColumnType::Boolean => any::<bool>().prop_map(CellValue::Boolean).boxed(),
            ColumnType::BigDecimal => (any::<i64>(), 0u32..1_000_000)
                .prop_map(|(whole, frac)| {
                    let literal = format!("{}.{:06}", whole, frac);
                    CellValue::BigNumber(BigDecimal::from_str(&literal).unwrap_or_default())
                })
                .boxed(),
            ColumnType::SerializedBlob => (any::<i64>(), "[a-z ]{0,12}", any::<bool>())
                .prop_map(|(n, s, b)| {
                    CellValue::Serializable(serde_json::json!({ "n": n, "s": s, "flag": b }))
                })
                .boxed(),
            ColumnType::RawBinary => prop::collection::vec(any::<u8>(), 0..64)
                .prop_map(CellValue::Binary)
                .boxed(),
        }
    }

    /// Generate a descriptor together with a value it can carry.
    pub fn arb_descriptor_and_value() -> impl Strategy<Value = (ColumnDescriptor, CellValue)> {
        arb_descriptor().prop_flat_map(|column| {
            let values = arb_value_for(&column);
            (Just(column), values)
        })
    }

    /// Generate a Mapping with up to eight columns.
    ///
    /// Columns that collide on `(family, qualifier)` or alias the key are
    /// dropped, so the result always satisfies the mapping invariants.
    pub fn arb_mapping() -> impl Strategy<Value = Mapping> {
        (
            arb_name(),
            arb_name(),
            arb_name(),
            arb_key_type(),
            prop::collection::vec(arb_descriptor(), 0..8),
        )
            .prop_map(|(table, mapping, key_name, key_type, columns)| {
                let mut builder = Mapping::builder(table, mapping, key_name, key_type);
                for column in columns {
                    let _ = builder.add_column(column);
                }
                builder.build()
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built mappings and values.

    use super::*;

    /// Labels used by the indexed column of [`every_type_mapping`].
    pub const SAMPLE_LABELS: [&str; 3] = ["a", "b", "c"];

    /// A mapping holding one column of every type, both widths of the
    /// numeric types and an indexed column over `{a,b,c}`.
    pub fn every_type_mapping(table: &str, mapping: &str) -> Mapping {
        let labels = SAMPLE_LABELS.iter().map(|l| l.to_string()).collect();
        let columns = vec![
            ColumnDescriptor::new("fam1", "string_col", "str", ColumnType::String),
            ColumnDescriptor::indexed("fam1", "indexed_col", "idx", labels),
            ColumnDescriptor::new("fam1", "int_col", "int", ColumnType::Integer).map(|c| c.with_wide(false)),
            ColumnDescriptor::new("fam1", "long_col", "long", ColumnType::Integer),
            ColumnDescriptor::new("fam2", "float_col", "float", ColumnType::Float).map(|c| c.with_wide(false)),
            ColumnDescriptor::new("fam2", "double_col", "double", ColumnType::Float),
            ColumnDescriptor::new("fam2", "date_col", "date", ColumnType::Date),
            ColumnDescriptor::new("fam2", "bool_col", "bool", ColumnType::Boolean),
            ColumnDescriptor::new("fam2", "decimal_col", "decimal", ColumnType::BigDecimal),
            ColumnDescriptor::new("fam2", "blob_col", "blob", ColumnType::SerializedBlob),
            ColumnDescriptor::new("fam2", "binary_col", "binary", ColumnType::RawBinary),
        ];

        let mut builder = Mapping::builder(table, mapping, "id", KeyType::Long);
        for column in columns {
            builder
                .add_column(column.expect("fixture column is valid"))
                .expect("fixture columns are distinct");
        }
        builder.build()
    }

    /// One value per alias of [`every_type_mapping`].
    pub fn every_type_values() -> Vec<(&'static str, CellValue)> {
        vec![
            ("str", CellValue::from("hello")),
            ("idx", CellValue::Indexed(2)),
            ("int", CellValue::Integer(-42)),
            ("long", CellValue::Integer(9_000_000_000)),
            ("float", CellValue::Number(1.5)),
            ("double", CellValue::Number(3.14)),
            (
                "date",
                CellValue::Date(DateTime::from_timestamp_millis(-86_400_000).unwrap_or_default()),
            ),
            ("bool", CellValue::Boolean(true)),
            (
                "decimal",
                CellValue::BigNumber(BigDecimal::from_str("12345.678").unwrap_or_default()),
            ),
            ("blob", CellValue::Serializable(serde_json::json!({"k": [1, 2]}))),
            ("binary", CellValue::Binary(vec![0, 1, 254, 255])),
        ]
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for cellmap error variants.

    use super::*;

    /// Assert that a CellmapResult is a Codec error.
    #[track_caller]
    pub fn assert_codec_error<T: std::fmt::Debug>(result: &CellmapResult<T>) {
        match result {
            Err(CellmapError::Codec(_)) => {}
            other => panic!("Expected Codec error, got: {:?}", other),
        }
    }

    /// Assert that a CellmapResult is a NotFound mapping error.
    #[track_caller]
    pub fn assert_mapping_not_found<T: std::fmt::Debug>(result: &CellmapResult<T>) {
        match result {
            Err(CellmapError::Mapping(MappingError::NotFound { .. })) => {}
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    /// Assert that a CellmapResult is a Store error.
    #[track_caller]
    pub fn assert_store_error<T: std::fmt::Debug>(result: &CellmapResult<T>) {
        match result {
            Err(CellmapError::Store(_)) => {}
            other => panic!("Expected Store error, got: {:?}", other),
        }
    }

    /// Assert two mappings agree on identity, key and column set.
    #[track_caller]
    pub fn assert_same_mapping(actual: &Mapping, expected: &Mapping) {
        assert_eq!(actual.table_name(), expected.table_name(), "table name");
        assert_eq!(actual.mapping_name(), expected.mapping_name(), "mapping name");
        assert_eq!(actual.key_name(), expected.key_name(), "key name");
        assert_eq!(actual.key_type(), expected.key_type(), "key type");
        assert_eq!(actual.columns(), expected.columns(), "columns");
    }
}
