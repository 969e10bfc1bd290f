//! Row-key codec.
//!
//! The store orders row keys by unsigned lexicographic byte comparison.
//! Two's-complement negatives have their top bit set and would sort after
//! every positive value, so signed key types (`Integer`, `Long`, `Date`)
//! flip the sign bit of the fixed-width big-endian representation before
//! emission and flip it back on decode. The unsigned key types store the
//! raw value and refuse negatives.

use cellmap_core::{CellValue, CodecError, CodecResult, KeyType};
use chrono::DateTime;

const SIGN_FLIP_MASK_32: u32 = 1u32 << 31;
const SIGN_FLIP_MASK_64: u64 = 1u64 << 63;

fn encode_i32_ordered(value: i32) -> [u8; 4] {
    (value as u32 ^ SIGN_FLIP_MASK_32).to_be_bytes()
}

fn decode_i32_ordered(bytes: [u8; 4]) -> i32 {
    (u32::from_be_bytes(bytes) ^ SIGN_FLIP_MASK_32) as i32
}

fn encode_i64_ordered(value: i64) -> [u8; 8] {
    (value as u64 ^ SIGN_FLIP_MASK_64).to_be_bytes()
}

fn decode_i64_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ SIGN_FLIP_MASK_64) as i64
}

/// Encode a key value for the given key type.
///
/// An absent value encodes as the empty string for `String` keys and as
/// zero of the key's width otherwise.
pub fn encode_key(value: Option<&CellValue>, key_type: KeyType) -> CodecResult<Vec<u8>> {
    if key_type == KeyType::String {
        return match value {
            None => Ok(Vec::new()),
            Some(CellValue::String(s)) => Ok(s.as_bytes().to_vec()),
            Some(other) => Err(CodecError::mismatch("String key", other.kind())),
        };
    }

    let raw = match value {
        None => 0,
        Some(v) => key_integer(v, key_type)?,
    };
    if key_type.is_unsigned() && raw < 0 {
        return Err(CodecError::NegativeValueForUnsigned {
            key_type,
            value: raw,
        });
    }

    let bytes = match key_type {
        KeyType::Integer => encode_i32_ordered(narrow(raw, key_type)?).to_vec(),
        KeyType::UnsignedInteger => narrow(raw, key_type)?.to_be_bytes().to_vec(),
        KeyType::Long | KeyType::Date => encode_i64_ordered(raw).to_vec(),
        KeyType::UnsignedLong | KeyType::UnsignedDate => raw.to_be_bytes().to_vec(),
        KeyType::String => unreachable!("string keys handled above"),
    };
    Ok(bytes)
}

/// Decode a key previously produced by [`encode_key`].
///
/// Numeric and date keys must be exactly 4 or 8 bytes as the key type
/// dictates; any other length is a type mismatch.
pub fn decode_key(bytes: &[u8], key_type: KeyType) -> CodecResult<CellValue> {
    match key_type {
        KeyType::String => std::str::from_utf8(bytes)
            .map(|s| CellValue::String(s.to_string()))
            .map_err(|e| CodecError::InvalidUtf8 {
                reason: e.to_string(),
            }),
        KeyType::Integer => {
            let raw = fixed::<4>(bytes, key_type)?;
            Ok(CellValue::Integer(i64::from(decode_i32_ordered(raw))))
        }
        KeyType::UnsignedInteger => {
            let raw = fixed::<4>(bytes, key_type)?;
            Ok(CellValue::Integer(i64::from(i32::from_be_bytes(raw))))
        }
        KeyType::Long => {
            let raw = fixed::<8>(bytes, key_type)?;
            Ok(CellValue::Integer(decode_i64_ordered(raw)))
        }
        KeyType::UnsignedLong => {
            let raw = fixed::<8>(bytes, key_type)?;
            Ok(CellValue::Integer(i64::from_be_bytes(raw)))
        }
        KeyType::Date => {
            let raw = fixed::<8>(bytes, key_type)?;
            millis_to_date(decode_i64_ordered(raw))
        }
        KeyType::UnsignedDate => {
            let raw = fixed::<8>(bytes, key_type)?;
            millis_to_date(i64::from_be_bytes(raw))
        }
    }
}

/// Integer view of a key value. Date keys also accept raw epoch millis.
fn key_integer(value: &CellValue, key_type: KeyType) -> CodecResult<i64> {
    match value {
        CellValue::Integer(v) => Ok(*v),
        CellValue::Date(ts) if key_type.is_date() => Ok(ts.timestamp_millis()),
        other => Err(CodecError::mismatch(
            format!("{} key", key_type),
            other.kind(),
        )),
    }
}

fn narrow(raw: i64, key_type: KeyType) -> CodecResult<i32> {
    i32::try_from(raw).map_err(|_| {
        CodecError::mismatch(format!("32-bit {} key", key_type), raw.to_string())
    })
}

fn fixed<const N: usize>(bytes: &[u8], key_type: KeyType) -> CodecResult<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| CodecError::invalid_width(format!("{} key", key_type), &N.to_string(), bytes.len()))
}

pub(crate) fn millis_to_date(millis: i64) -> CodecResult<CellValue> {
    DateTime::from_timestamp_millis(millis)
        .map(CellValue::Date)
        .ok_or(CodecError::DateOutOfRange { millis })
}
