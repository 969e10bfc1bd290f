//! Property-Based Tests for the Cell Codec
//!
//! Properties:
//! - Every column type decodes what it encodes
//! - Signed key encodings sort in numeric order under byte comparison
//! - Whole rows survive an encode/decode pass through a mapping

use cellmap_codec::{decode_column, decode_key, decode_row, encode_column, encode_key, RowEncoder};
use cellmap_core::{CellValue, CodecError, KeyType};
use cellmap_test_utils::fixtures::{every_type_mapping, every_type_values};
use cellmap_test_utils::generators::{arb_descriptor_and_value, arb_key_type};
use proptest::prelude::*;

// ============================================================================
// COLUMN ROUND TRIP
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_column_roundtrip((column, value) in arb_descriptor_and_value()) {
        let bytes = encode_column(&value, &column).unwrap();
        let decoded = decode_column(Some(&bytes), &column).unwrap();
        prop_assert_eq!(decoded, Some(value));
    }

    /// Absent cells are "no value", never an error.
    #[test]
    fn prop_absent_cell_decodes_to_none((column, _value) in arb_descriptor_and_value()) {
        prop_assert_eq!(decode_column(None, &column).unwrap(), None);
    }
}

// ============================================================================
// KEY ORDERING
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_signed_key_order(a in any::<i32>(), b in any::<i32>(), key_type in prop::sample::select(vec![KeyType::Integer, KeyType::Long, KeyType::Date])) {
        let ea = encode_key(Some(&CellValue::from(a)), key_type).unwrap();
        let eb = encode_key(Some(&CellValue::from(b)), key_type).unwrap();
        prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
    }

    #[test]
    fn prop_negative_rejected_for_unsigned(v in i32::MIN..0, key_type in arb_key_type()) {
        let result = encode_key(Some(&CellValue::from(v)), key_type);
        if key_type.is_unsigned() {
            let is_negative_error = matches!(result, Err(CodecError::NegativeValueForUnsigned { .. }));
            prop_assert!(is_negative_error);
        } else if key_type == KeyType::String {
            prop_assert!(result.is_err());
        } else {
            let decoded = decode_key(&result.unwrap(), key_type).unwrap();
            if key_type.is_date() {
                prop_assert!(matches!(decoded, CellValue::Date(_)));
            } else {
                prop_assert_eq!(decoded, CellValue::from(v));
            }
        }
    }
}

// ============================================================================
// ROW ROUND TRIP
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_every_type_row_roundtrip(key in any::<i64>()) {
        let mapping = every_type_mapping("t", "m");
        let row = RowEncoder::new(&mapping)
            .encode(Some(&CellValue::Integer(key)), every_type_values())
            .unwrap()
            .into_row();
        let decoded = decode_row(&mapping, &row).unwrap();
        prop_assert_eq!(decoded.key, CellValue::Integer(key));
        for (alias, value) in every_type_values() {
            prop_assert_eq!(decoded.values[alias].as_ref(), Some(&value));
        }
    }
}

#[test]
fn test_unsigned_integer_minus_five() {
    let err = encode_key(Some(&CellValue::Integer(-5)), KeyType::UnsignedInteger).unwrap_err();
    assert_eq!(
        err,
        CodecError::NegativeValueForUnsigned {
            key_type: KeyType::UnsignedInteger,
            value: -5
        }
    );
}
