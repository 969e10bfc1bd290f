//! Column value codec.
//!
//! Non-key cells are stored without any order-preserving transform:
//! integers and floats are raw big-endian two's-complement / IEEE-754,
//! dates are raw epoch millis. Ordering over those cells goes through the
//! deserializing comparators instead.

use crate::fallback::{decode_boolean, decode_decimal};
use crate::key::millis_to_date;
use cellmap_core::{CellValue, ColumnDescriptor, ColumnType, CodecError, CodecResult};

/// Encode a value for the given column.
///
/// The value's variant must agree with the column type; nothing is coerced.
pub fn encode_column(value: &CellValue, column: &ColumnDescriptor) -> CodecResult<Vec<u8>> {
    let column_type = column.column_type();
    match (column_type, value) {
        (ColumnType::String, CellValue::String(s)) => Ok(s.as_bytes().to_vec()),
        (ColumnType::IndexedString, CellValue::Indexed(index)) => {
            let labels = column.labels().unwrap_or_default();
            labels
                .get(*index)
                .map(|label| label.as_bytes().to_vec())
                .ok_or(CodecError::IndexOutOfRange {
                    index: *index,
                    labels: labels.len(),
                })
        }
        (ColumnType::Integer, CellValue::Integer(v)) => {
            if column.is_wide() {
                Ok(v.to_be_bytes().to_vec())
            } else {
                let narrow = i32::try_from(*v).map_err(|_| {
                    CodecError::mismatch("32-bit Integer", format!("out-of-range value {}", v))
                })?;
                Ok(narrow.to_be_bytes().to_vec())
            }
        }
        (ColumnType::Float, CellValue::Number(v)) => {
            if column.is_wide() {
                Ok(v.to_be_bytes().to_vec())
            } else {
                let narrow = *v as f32;
                if v.is_finite() && !narrow.is_finite() {
                    return Err(CodecError::mismatch(
                        "32-bit Float",
                        format!("out-of-range value {}", v),
                    ));
                }
                Ok(narrow.to_be_bytes().to_vec())
            }
        }
        (ColumnType::Date, CellValue::Date(ts)) => Ok(ts.timestamp_millis().to_be_bytes().to_vec()),
        (ColumnType::Boolean, CellValue::Boolean(b)) => {
            Ok(if *b { b"Y".to_vec() } else { b"N".to_vec() })
        }
        (ColumnType::BigDecimal, CellValue::BigNumber(d)) => Ok(d.to_string().into_bytes()),
        (ColumnType::SerializedBlob, CellValue::Serializable(v)) => {
            serde_json::to_vec(v).map_err(|e| CodecError::UndecodableBlob {
                reason: e.to_string(),
            })
        }
        (ColumnType::RawBinary, CellValue::Binary(bytes)) => Ok(bytes.clone()),
        (_, other) => Err(CodecError::mismatch(column.type_name(), other.kind())),
    }
}

/// Decode a cell for the given column. An absent cell decodes to `None`.
pub fn decode_column(raw: Option<&[u8]>, column: &ColumnDescriptor) -> CodecResult<Option<CellValue>> {
    match raw {
        None => Ok(None),
        Some(bytes) => decode_present(bytes, column).map(Some),
    }
}

fn decode_present(bytes: &[u8], column: &ColumnDescriptor) -> CodecResult<CellValue> {
    match column.column_type() {
        ColumnType::String => utf8(bytes).map(|s| CellValue::String(s.to_string())),
        ColumnType::IndexedString => {
            let label = utf8(bytes)?;
            column
                .label_index(label)
                .map(CellValue::Indexed)
                .ok_or_else(|| CodecError::UnknownEnumLabel {
                    label: label.to_string(),
                })
        }
        ColumnType::Integer => decode_integer(bytes)
            .map(CellValue::Integer)
            .ok_or_else(|| CodecError::invalid_width(column.type_name(), "2, 4 or 8", bytes.len())),
        ColumnType::Float => decode_float(bytes)
            .map(CellValue::Number)
            .ok_or_else(|| CodecError::invalid_width(column.type_name(), "4 or 8", bytes.len())),
        ColumnType::Date => {
            let raw: [u8; 8] = bytes
                .try_into()
                .map_err(|_| CodecError::invalid_width("Date", "8", bytes.len()))?;
            millis_to_date(i64::from_be_bytes(raw))
        }
        ColumnType::Boolean => decode_boolean(bytes).map(CellValue::Boolean),
        ColumnType::BigDecimal => decode_decimal(bytes).map(CellValue::BigNumber),
        ColumnType::SerializedBlob => serde_json::from_slice(bytes)
            .map(CellValue::Serializable)
            .map_err(|e| CodecError::UndecodableBlob {
                reason: e.to_string(),
            }),
        ColumnType::RawBinary => Ok(CellValue::Binary(bytes.to_vec())),
    }
}

/// Big-endian signed integer of 2, 4 or 8 bytes, widened to 64 bits.
///
/// Two-byte input is never produced by [`encode_column`] but is accepted
/// from external writers.
pub fn decode_integer(bytes: &[u8]) -> Option<i64> {
    match bytes.len() {
        2 => Some(i64::from(i16::from_be_bytes(bytes.try_into().ok()?))),
        4 => Some(i64::from(i32::from_be_bytes(bytes.try_into().ok()?))),
        8 => Some(i64::from_be_bytes(bytes.try_into().ok()?)),
        _ => None,
    }
}

/// IEEE-754 float (widened) or double.
pub fn decode_float(bytes: &[u8]) -> Option<f64> {
    match bytes.len() {
        4 => Some(f64::from(f32::from_be_bytes(bytes.try_into().ok()?))),
        8 => Some(f64::from_be_bytes(bytes.try_into().ok()?)),
        _ => None,
    }
}

fn utf8(bytes: &[u8]) -> CodecResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8 {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::DateTime;
    use std::str::FromStr;

    fn col(column_type: ColumnType) -> ColumnDescriptor {
        ColumnDescriptor::new("f", "q", "a", column_type).unwrap()
    }

    fn roundtrip(value: CellValue, column: &ColumnDescriptor) -> CellValue {
        let bytes = encode_column(&value, column).unwrap();
        decode_column(Some(&bytes), column).unwrap().unwrap()
    }

    #[test]
    fn test_double_roundtrip() {
        assert_eq!(
            roundtrip(CellValue::Number(3.14), &col(ColumnType::Float)),
            CellValue::Number(3.14)
        );
    }

    #[test]
    fn test_narrow_float_is_four_bytes() {
        let column = col(ColumnType::Float).with_wide(false);
        let bytes = encode_column(&CellValue::Number(1.5), &column).unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(decode_column(Some(&bytes), &column).unwrap(), Some(CellValue::Number(1.5)));
    }

    #[test]
    fn test_narrow_float_rejects_out_of_range() {
        let column = col(ColumnType::Float).with_wide(false);
        assert!(matches!(
            encode_column(&CellValue::Number(1e300), &column),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert!(encode_column(&CellValue::Number(-1e39), &column).is_err());
        let inf = encode_column(&CellValue::Number(f64::INFINITY), &column).unwrap();
        assert_eq!(decode_column(Some(&inf), &column).unwrap(), Some(CellValue::Number(f64::INFINITY)));
    }

    #[test]
    fn test_integer_widths() {
        let long = col(ColumnType::Integer);
        let int = col(ColumnType::Integer).with_wide(false);
        assert_eq!(encode_column(&CellValue::Integer(-2), &long).unwrap().len(), 8);
        assert_eq!(
            encode_column(&CellValue::Integer(-2), &int).unwrap(),
            (-2i32).to_be_bytes().to_vec()
        );
        assert_eq!(roundtrip(CellValue::Integer(-2), &int), CellValue::Integer(-2));
        assert!(matches!(
            encode_column(&CellValue::Integer(i64::MAX), &int),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_integer_no_sign_flip() {
        let bytes = encode_column(&CellValue::Integer(-1), &col(ColumnType::Integer)).unwrap();
        assert_eq!(bytes, vec![0xff; 8]);
    }

    #[test]
    fn test_integer_accepts_short_input() {
        let column = col(ColumnType::Integer);
        assert_eq!(
            decode_column(Some(&(-300i16).to_be_bytes()), &column).unwrap(),
            Some(CellValue::Integer(-300))
        );
        assert!(matches!(
            decode_column(Some(&[1, 2, 3]), &column),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_float_rejects_bad_width() {
        let err = decode_column(Some(&[0, 0, 0]), &col(ColumnType::Float)).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn test_boolean_encoding_and_fallback() {
        let column = col(ColumnType::Boolean);
        assert_eq!(encode_column(&CellValue::Boolean(true), &column).unwrap(), b"Y");
        assert_eq!(encode_column(&CellValue::Boolean(false), &column).unwrap(), b"N");
        for raw in [&b"Y"[..], b"yes", b"T", b"1"] {
            assert_eq!(decode_column(Some(raw), &column).unwrap(), Some(CellValue::Boolean(true)));
        }
        assert_eq!(
            decode_column(Some(&1i32.to_be_bytes()), &column).unwrap(),
            Some(CellValue::Boolean(true))
        );
        assert!(matches!(
            decode_column(Some(&[7, 7, 7]), &column),
            Err(CodecError::UndecodableBoolean { len: 3 })
        ));
    }

    #[test]
    fn test_indexed_string() {
        let column = ColumnDescriptor::indexed(
            "f",
            "q",
            "a",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .unwrap();
        assert_eq!(encode_column(&CellValue::Indexed(1), &column).unwrap(), b"b");
        assert_eq!(roundtrip(CellValue::Indexed(2), &column), CellValue::Indexed(2));
        assert_eq!(
            decode_column(Some(b"z"), &column).unwrap_err(),
            CodecError::UnknownEnumLabel { label: "z".into() }
        );
        assert_eq!(
            encode_column(&CellValue::Indexed(3), &column).unwrap_err(),
            CodecError::IndexOutOfRange { index: 3, labels: 3 }
        );
    }

    #[test]
    fn test_date_raw_millis() {
        let column = col(ColumnType::Date);
        let ts = DateTime::from_timestamp_millis(-5_000).unwrap();
        let bytes = encode_column(&CellValue::Date(ts), &column).unwrap();
        assert_eq!(bytes, (-5_000i64).to_be_bytes().to_vec());
        assert_eq!(roundtrip(CellValue::Date(ts), &column), CellValue::Date(ts));
        assert!(matches!(
            decode_column(Some(&i64::MAX.to_be_bytes()), &column),
            Err(CodecError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_big_decimal_string_form() {
        let column = col(ColumnType::BigDecimal);
        let value = BigDecimal::from_str("123456789.000000001").unwrap();
        let bytes = encode_column(&CellValue::BigNumber(value.clone()), &column).unwrap();
        assert_eq!(bytes, b"123456789.000000001");
        assert_eq!(roundtrip(CellValue::BigNumber(value.clone()), &column), CellValue::BigNumber(value));
    }

    #[test]
    fn test_serialized_blob_and_binary() {
        let blob = CellValue::Serializable(serde_json::json!({"a": [1, 2, 3]}));
        assert_eq!(roundtrip(blob.clone(), &col(ColumnType::SerializedBlob)), blob);

        let raw = vec![0u8, 255, 7];
        let binary = col(ColumnType::RawBinary);
        assert_eq!(encode_column(&CellValue::Binary(raw.clone()), &binary).unwrap(), raw);
        assert_eq!(roundtrip(CellValue::Binary(raw.clone()), &binary), CellValue::Binary(raw));
    }

    #[test]
    fn test_absent_cell_is_none() {
        for column_type in ColumnType::ALL {
            if column_type == ColumnType::IndexedString {
                continue;
            }
            assert_eq!(decode_column(None, &col(column_type)).unwrap(), None);
        }
    }

    #[test]
    fn test_mismatched_value_fails_fast() {
        let err = encode_column(&CellValue::from("12"), &col(ColumnType::Integer)).unwrap_err();
        assert_eq!(err, CodecError::mismatch("Long", "String"));
        assert!(encode_column(&CellValue::Integer(1), &col(ColumnType::Boolean)).is_err());
    }
}
