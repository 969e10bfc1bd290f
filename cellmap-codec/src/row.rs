//! Whole-row encode and decode through a mapping

use crate::key::{decode_key, encode_key};
use crate::value::{decode_column, encode_column};
use cellmap_core::{CellValue, CellmapResult, CodecError, Mapping, MappingError, Row};
use std::collections::BTreeMap;

/// One encoded cell ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCell {
    pub family: String,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
}

/// An encoded row key and its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    pub key: Vec<u8>,
    pub cells: Vec<EncodedCell>,
}

impl EncodedRow {
    pub fn into_row(self) -> Row {
        let mut row = Row::new(self.key);
        for cell in self.cells {
            row.set_cell(cell.family, cell.qualifier, cell.value);
        }
        row
    }
}

/// Encodes application values into store rows for one mapping.
#[derive(Debug, Clone, Copy)]
pub struct RowEncoder<'a> {
    mapping: &'a Mapping,
}

impl<'a> RowEncoder<'a> {
    pub fn new(mapping: &'a Mapping) -> Self {
        Self { mapping }
    }

    /// Encode a key and `(alias, value)` pairs.
    ///
    /// Aliases not in the mapping fail with `UnknownAlias`; mapped columns
    /// without a value are simply not written.
    pub fn encode<I, A>(&self, key: Option<&CellValue>, values: I) -> CellmapResult<EncodedRow>
    where
        I: IntoIterator<Item = (A, CellValue)>,
        A: AsRef<str>,
    {
        let key = encode_key(key, self.mapping.key_type())?;
        let mut cells = Vec::new();
        for (alias, value) in values {
            let alias = alias.as_ref();
            let column = self
                .mapping
                .column(alias)
                .ok_or_else(|| MappingError::UnknownAlias {
                    alias: alias.to_string(),
                })?;
            cells.push(EncodedCell {
                family: column.family().to_string(),
                qualifier: column.qualifier().as_bytes().to_vec(),
                value: encode_column(&value, column)?,
            });
        }
        Ok(EncodedRow { key, cells })
    }
}

/// A row decoded through a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub key: CellValue,
    /// Every mapped alias; `None` where the row has no cell.
    pub values: BTreeMap<String, Option<CellValue>>,
}

/// Decode the key and every mapped column of `row`.
pub fn decode_row(mapping: &Mapping, row: &Row) -> CellmapResult<DecodedRow> {
    let key = decode_key(&row.key, mapping.key_type())?;
    let mut values = BTreeMap::new();
    for (alias, column) in mapping.columns() {
        let raw = row.cell(column.family(), column.qualifier().as_bytes());
        values.insert(alias.clone(), decode_column(raw, column)?);
    }
    Ok(DecodedRow { key, values })
}

/// One cell of a tuple mapping: key, family, column name and raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleRecord {
    pub key: CellValue,
    pub family: String,
    pub column: String,
    pub value: Vec<u8>,
}

/// Flatten a row into one record per cell.
///
/// Only the mapping's tuple families are visited, or every family when
/// none are listed.
pub fn decode_tuples(mapping: &Mapping, row: &Row) -> CellmapResult<Vec<TupleRecord>> {
    let key = decode_key(&row.key, mapping.key_type())?;
    let wanted = mapping.tuple_family_list();
    let mut records = Vec::new();
    for (family, cells) in &row.families {
        if !wanted.is_empty() && !wanted.contains(&family.as_str()) {
            continue;
        }
        for (qualifier, value) in cells {
            let column = std::str::from_utf8(qualifier).map_err(|e| CodecError::InvalidUtf8 {
                reason: e.to_string(),
            })?;
            records.push(TupleRecord {
                key: key.clone(),
                family: family.clone(),
                column: column.to_string(),
                value: value.clone(),
            });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellmap_core::{CellmapError, ColumnDescriptor, ColumnType, KeyType};

    fn mapping() -> Mapping {
        Mapping::builder("t", "m", "id", KeyType::Long)
            .with_column(ColumnDescriptor::new("f", "name", "name", ColumnType::String).unwrap())
            .unwrap()
            .with_column(ColumnDescriptor::new("f", "age", "age", ColumnType::Integer).unwrap())
            .unwrap()
            .with_column(ColumnDescriptor::new("g", "ok", "ok", ColumnType::Boolean).unwrap())
            .unwrap()
            .build()
    }

    #[test]
    fn test_encode_then_decode_row() {
        let mapping = mapping();
        let encoded = RowEncoder::new(&mapping)
            .encode(
                Some(&CellValue::Integer(-7)),
                vec![("name", CellValue::from("ann")), ("age", CellValue::Integer(31))],
            )
            .unwrap();
        assert_eq!(encoded.cells.len(), 2);

        let decoded = decode_row(&mapping, &encoded.into_row()).unwrap();
        assert_eq!(decoded.key, CellValue::Integer(-7));
        assert_eq!(decoded.values["name"], Some(CellValue::from("ann")));
        assert_eq!(decoded.values["age"], Some(CellValue::Integer(31)));
        assert_eq!(decoded.values["ok"], None);
    }

    #[test]
    fn test_unknown_alias_rejected() {
        let mapping = mapping();
        let err = RowEncoder::new(&mapping)
            .encode(None, vec![("nope", CellValue::Integer(1))])
            .unwrap_err();
        assert_eq!(
            err,
            CellmapError::Mapping(MappingError::UnknownAlias { alias: "nope".into() })
        );
    }

    #[test]
    fn test_encode_type_mismatch_propagates() {
        let mapping = mapping();
        let err = RowEncoder::new(&mapping)
            .encode(None, vec![("age", CellValue::from("old"))])
            .unwrap_err();
        assert!(matches!(err, CellmapError::Codec(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_decode_tuples_filters_families() {
        let mapping = Mapping::builder("t", "m", "id", KeyType::String)
            .tuple(Some("f".to_string()))
            .build();
        let mut row = Row::new(b"k1".to_vec());
        row.set_cell("f", b"a".to_vec(), b"1".to_vec());
        row.set_cell("f", b"b".to_vec(), b"2".to_vec());
        row.set_cell("g", b"c".to_vec(), b"3".to_vec());

        let records = decode_tuples(&mapping, &row).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.family == "f" && r.key == CellValue::from("k1")));
        assert_eq!(records[1].column, "b");

        let all = Mapping::builder("t", "m", "id", KeyType::String).tuple(None).build();
        assert_eq!(decode_tuples(&all, &row).unwrap().len(), 3);
    }
}
