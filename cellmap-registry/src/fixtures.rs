//! Sample table and mapping for demos and integration tests.
//!
//! The sample table has two families, `Family1` and `Family2`, and a signed
//! `Long` key running upward from -500. Cell values are a deterministic
//! function of the key, so repeated runs produce identical tables.

use bigdecimal::BigDecimal;
use cellmap_codec::RowEncoder;
use cellmap_core::{
    CellValue, CellmapResult, CodecError, ColumnDescriptor, ColumnType, KeyType, Mapping,
    MappingError, Timestamp,
};
use cellmap_storage::StoreAdmin;
use chrono::DateTime;

pub const SAMPLE_FAMILIES: [&str; 2] = ["Family1", "Family2"];
pub const SAMPLE_KEY_NAME: &str = "MyKey";
pub const SAMPLE_LABELS: [&str; 3] = ["nomVal1", "nomVal2", "nomVal3"];
/// Key of the first sample row.
pub const FIRST_SAMPLE_KEY: i64 = -500;

const DAY_MILLIS: i64 = 86_400_000;
/// 2020-01-01T00:00:00Z
const UNSIGNED_DATE_BASE: i64 = 1_577_836_800_000;

/// `(family, column, type)` of every sample column. The alias is the column.
const SAMPLE_COLUMNS: [(&str, &str, SampleType); 16] = [
    ("Family1", "first_integer_column", SampleType::Int),
    ("Family1", "first_string_column", SampleType::Plain(ColumnType::String)),
    ("Family1", "first_unsigned_date_column", SampleType::Plain(ColumnType::Date)),
    ("Family1", "first_signed_date_column", SampleType::Plain(ColumnType::Date)),
    ("Family1", "first_boolean_column", SampleType::Plain(ColumnType::Boolean)),
    ("Family1", "first_serialized_column", SampleType::Plain(ColumnType::SerializedBlob)),
    ("Family1", "first_binary_column", SampleType::Plain(ColumnType::RawBinary)),
    ("Family2", "first_indexed_column", SampleType::Indexed),
    ("Family2", "first_signed_int_column", SampleType::Int),
    ("Family2", "first_unsigned_float_column", SampleType::Float),
    ("Family2", "first_signed_float_column", SampleType::Float),
    ("Family2", "first_unsigned_double_column", SampleType::Plain(ColumnType::Float)),
    ("Family2", "first_signed_double_column", SampleType::Plain(ColumnType::Float)),
    ("Family2", "first_unsigned_long_column", SampleType::Plain(ColumnType::Integer)),
    ("Family2", "first_signed_long_column", SampleType::Plain(ColumnType::Integer)),
    ("Family2", "first_decimal_column", SampleType::Plain(ColumnType::BigDecimal)),
];

#[derive(Clone, Copy)]
enum SampleType {
    Plain(ColumnType),
    /// 32-bit integer
    Int,
    /// 32-bit float
    Float,
    Indexed,
}

/// The mapping that decodes every column of a sample table.
pub fn sample_mapping(table: &str, mapping: &str) -> Result<Mapping, MappingError> {
    let mut builder = Mapping::builder(table, mapping, SAMPLE_KEY_NAME, KeyType::Long);
    for (family, column, kind) in SAMPLE_COLUMNS {
        let descriptor = match kind {
            SampleType::Plain(column_type) => {
                ColumnDescriptor::new(family, column, column, column_type)?
            }
            SampleType::Int => {
                ColumnDescriptor::new(family, column, column, ColumnType::Integer)?.with_wide(false)
            }
            SampleType::Float => {
                ColumnDescriptor::new(family, column, column, ColumnType::Float)?.with_wide(false)
            }
            SampleType::Indexed => ColumnDescriptor::indexed(
                family,
                column,
                column,
                SAMPLE_LABELS.iter().map(|l| l.to_string()).collect(),
            )?,
        };
        builder.add_column(descriptor)?;
    }
    Ok(builder.build())
}

/// Drop and recreate `table`, then fill it with `rows` sample rows keyed
/// from [`FIRST_SAMPLE_KEY`] upward.
pub fn create_sample_table<S: StoreAdmin + ?Sized>(
    store: &S,
    table: &str,
    rows: usize,
) -> CellmapResult<()> {
    if store.table_exists(table)? {
        if !store.is_table_disabled(table)? {
            store.disable_table(table)?;
        }
        store.delete_table(table)?;
        tracing::info!(table, "dropped existing sample table");
    }
    store.create_table(table, &SAMPLE_FAMILIES)?;

    let mapping = sample_mapping(table, "sample")?;
    let encoder = RowEncoder::new(&mapping);
    for key in (FIRST_SAMPLE_KEY..).take(rows) {
        let encoded = encoder.encode(Some(&CellValue::Integer(key)), sample_values(key)?)?;
        for cell in &encoded.cells {
            store.put(table, &encoded.key, &cell.family, &cell.qualifier, &cell.value)?;
        }
    }
    tracing::info!(table, rows, "created sample table");
    Ok(())
}

/// Values written for the row at `key`.
pub fn sample_values(key: i64) -> CellmapResult<Vec<(&'static str, CellValue)>> {
    let offset = key - FIRST_SAMPLE_KEY;
    let noise = unit_noise(key);

    let mut values = vec![
        ("first_integer_column", CellValue::Integer(key / 10)),
        ("first_string_column", CellValue::String(format!("StringValue_{}", key))),
        (
            "first_unsigned_date_column",
            CellValue::Date(date(UNSIGNED_DATE_BASE + offset * DAY_MILLIS)?),
        ),
        (
            "first_signed_date_column",
            CellValue::Date(date(-(offset + 1) * DAY_MILLIS)?),
        ),
        ("first_boolean_column", CellValue::Boolean(noise > 0.5)),
        (
            "first_serialized_column",
            CellValue::Serializable(serde_json::json!({ "key": key, "ratio": noise })),
        ),
        ("first_binary_column", CellValue::Binary(5_034_555i32.to_be_bytes().to_vec())),
        ("first_signed_int_column", CellValue::Integer((noise * 2000.0) as i64 - 1000)),
        ("first_unsigned_float_column", CellValue::Number(f64::from(noise as f32))),
        ("first_signed_float_column", CellValue::Number(f64::from((noise - 0.5) as f32))),
        ("first_unsigned_double_column", CellValue::Number(noise * 1000.0)),
        ("first_signed_double_column", CellValue::Number(key as f64 * noise)),
        ("first_unsigned_long_column", CellValue::Integer(offset * 1_000_003)),
        ("first_signed_long_column", CellValue::Integer(key * 1_000_003)),
        (
            "first_decimal_column",
            CellValue::BigNumber(BigDecimal::new(key.into(), 2)),
        ),
    ];
    // Every tenth row leaves the indexed cell empty.
    if key % 10 != 0 {
        let ordinal = (mix(key as u64) % SAMPLE_LABELS.len() as u64) as usize;
        values.push(("first_indexed_column", CellValue::Indexed(ordinal)));
    }
    Ok(values)
}

fn date(millis: i64) -> Result<Timestamp, CodecError> {
    DateTime::from_timestamp_millis(millis).ok_or(CodecError::DateOutOfRange { millis })
}

/// splitmix64 finalizer.
fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic value in `[0, 1)` derived from `key`.
fn unit_noise(key: i64) -> f64 {
    (mix(key as u64 ^ 0x5EED) >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellmap_codec::decode_row;
    use cellmap_storage::MockStore;

    #[test]
    fn test_sample_mapping_covers_every_column_type() {
        let mapping = sample_mapping("t", "m").unwrap();
        for column_type in ColumnType::ALL {
            assert!(
                mapping.columns().values().any(|c| c.column_type() == column_type),
                "missing {:?}",
                column_type
            );
        }
        assert_eq!(mapping.families(), SAMPLE_FAMILIES.to_vec());
    }

    #[test]
    fn test_sample_values_are_deterministic() {
        assert_eq!(sample_values(-17).unwrap(), sample_values(-17).unwrap());
        assert_ne!(unit_noise(1), unit_noise(2));
        assert!((0.0..1.0).contains(&unit_noise(42)));
    }

    #[test]
    fn test_sample_table_round_trips_through_mapping() {
        let store = MockStore::new();
        create_sample_table(&store, "sample", 25).unwrap();
        assert_eq!(store.row_count("sample"), 25);

        let mapping = sample_mapping("sample", "m").unwrap();
        let rows = store.fetch_rows("sample", None, None, 100).unwrap();
        let keys: Vec<CellValue> = rows
            .iter()
            .map(|row| decode_row(&mapping, row).unwrap().key)
            .collect();
        let expected: Vec<CellValue> = (-500..-475).map(CellValue::Integer).collect();
        assert_eq!(keys, expected);

        let first = decode_row(&mapping, &rows[0]).unwrap();
        assert_eq!(first.values["first_indexed_column"], None);
        assert_eq!(
            first.values["first_string_column"],
            Some(CellValue::String("StringValue_-500".into()))
        );
        let second = decode_row(&mapping, &rows[1]).unwrap();
        assert!(matches!(second.values["first_indexed_column"], Some(CellValue::Indexed(i)) if i < 3));
    }

    #[test]
    fn test_create_sample_table_replaces_existing() {
        let store = MockStore::new();
        create_sample_table(&store, "sample", 10).unwrap();
        create_sample_table(&store, "sample", 3).unwrap();
        assert_eq!(store.row_count("sample"), 3);
    }
}
