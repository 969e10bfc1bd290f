//! Ordered fallback decoders for booleans and decimals.
//!
//! Each strategy is a plain function returning `Some` on success. A chain
//! is tried front to back and the first success wins; exhausting the chain
//! is reported by the caller with the matching `Undecodable*` error.

use bigdecimal::BigDecimal;
use cellmap_core::{CodecError, CodecResult};
use std::str::FromStr;

/// A single decode attempt.
pub type Decoder<T> = fn(&[u8]) -> Option<T>;

/// Boolean decode order: textual token, then integer, then float.
pub const BOOLEAN_CHAIN: &[Decoder<bool>] = &[bool_from_token, bool_from_integer, bool_from_float];

/// Decimal decode order: textual literal, then serialized number.
pub const DECIMAL_CHAIN: &[Decoder<BigDecimal>] = &[decimal_from_literal, decimal_from_serialized];

/// Run `chain` against `bytes`, returning the first success.
pub fn first_success<T>(chain: &[Decoder<T>], bytes: &[u8]) -> Option<T> {
    chain.iter().find_map(|decode| decode(bytes))
}

pub fn decode_boolean(bytes: &[u8]) -> CodecResult<bool> {
    first_success(BOOLEAN_CHAIN, bytes).ok_or(CodecError::UndecodableBoolean { len: bytes.len() })
}

pub fn decode_decimal(bytes: &[u8]) -> CodecResult<BigDecimal> {
    first_success(DECIMAL_CHAIN, bytes).ok_or_else(|| CodecError::UndecodableDecimal {
        reason: format!("{} bytes are neither a decimal literal nor a serialized number", bytes.len()),
    })
}

// =============================================================================
// BOOLEAN STRATEGIES
// =============================================================================

/// `Y/YES/TRUE/T/1` and `N/NO/FALSE/F/0`, case-insensitive.
pub fn bool_from_token(bytes: &[u8]) -> Option<bool> {
    // Longest token is "false".
    if bytes.is_empty() || bytes.len() > 5 {
        return None;
    }
    let token = std::str::from_utf8(bytes).ok()?.to_ascii_uppercase();
    match token.as_str() {
        "Y" | "YES" | "TRUE" | "T" | "1" => Some(true),
        "N" | "NO" | "FALSE" | "F" | "0" => Some(false),
        _ => None,
    }
}

/// Big-endian signed integer of 1, 2, 4 or 8 bytes holding 0 or 1.
pub fn bool_from_integer(bytes: &[u8]) -> Option<bool> {
    let value = match bytes.len() {
        1 => i64::from(bytes[0] as i8),
        2 => i64::from(i16::from_be_bytes(bytes.try_into().ok()?)),
        4 => i64::from(i32::from_be_bytes(bytes.try_into().ok()?)),
        8 => i64::from_be_bytes(bytes.try_into().ok()?),
        _ => return None,
    };
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// IEEE-754 float (4 bytes) or double (8 bytes) holding 0.0 or 1.0.
pub fn bool_from_float(bytes: &[u8]) -> Option<bool> {
    let value = match bytes.len() {
        4 => f64::from(f32::from_be_bytes(bytes.try_into().ok()?)),
        8 => f64::from_be_bytes(bytes.try_into().ok()?),
        _ => return None,
    };
    if value == 0.0 {
        Some(false)
    } else if value == 1.0 {
        Some(true)
    } else {
        None
    }
}

// =============================================================================
// DECIMAL STRATEGIES
// =============================================================================

/// UTF-8 decimal literal such as `-12.50` or `1e3`.
pub fn decimal_from_literal(bytes: &[u8]) -> Option<BigDecimal> {
    let text = std::str::from_utf8(bytes).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    BigDecimal::from_str(text).ok()
}

/// Serialized blob that holds a number, or a string holding a decimal.
pub fn decimal_from_serialized(bytes: &[u8]) -> Option<BigDecimal> {
    match serde_json::from_slice::<serde_json::Value>(bytes).ok()? {
        serde_json::Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
