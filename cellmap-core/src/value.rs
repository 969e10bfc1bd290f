//! Typed application values carried through the codecs

use crate::Timestamp;
use bigdecimal::BigDecimal;
use std::fmt;

/// A typed value for a row key or a mapped cell.
///
/// Narrow integer and floating columns are widened on decode, so a single
/// `Integer(i64)` and `Number(f64)` cover both widths.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    /// Ordinal position within an indexed column's label set
    Indexed(usize),
    Integer(i64),
    Number(f64),
    Date(Timestamp),
    Boolean(bool),
    BigNumber(BigDecimal),
    /// Generic serialized object
    Serializable(serde_json::Value),
    Binary(Vec<u8>),
}

impl CellValue {
    /// Variant name used in type-mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::String(_) => "String",
            CellValue::Indexed(_) => "Indexed",
            CellValue::Integer(_) => "Integer",
            CellValue::Number(_) => "Number",
            CellValue::Date(_) => "Date",
            CellValue::Boolean(_) => "Boolean",
            CellValue::BigNumber(_) => "BigNumber",
            CellValue::Serializable(_) => "Serializable",
            CellValue::Binary(_) => "Binary",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Indexed(i) => write!(f, "#{}", i),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Date(ts) => write!(f, "{}", ts.to_rfc3339()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::BigNumber(d) => write!(f, "{}", d),
            CellValue::Serializable(v) => write!(f, "{}", v),
            CellValue::Binary(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Integer(i64::from(v))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<Timestamp> for CellValue {
    fn from(ts: Timestamp) -> Self {
        CellValue::Date(ts)
    }
}

impl From<BigDecimal> for CellValue {
    fn from(d: BigDecimal) -> Self {
        CellValue::BigNumber(d)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(bytes: Vec<u8>) -> Self {
        CellValue::Binary(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_binary_as_hex() {
        let v = CellValue::Binary(vec![0x00, 0x4c, 0xd1, 0x3b]);
        assert_eq!(v.to_string(), "0x004cd13b");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CellValue::from(3i32).kind(), "Integer");
        assert_eq!(CellValue::from("x").kind(), "String");
        assert_eq!(CellValue::Indexed(2).kind(), "Indexed");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(CellValue::from(7i64).as_i64(), Some(7));
        assert_eq!(CellValue::from(true).as_bool(), Some(true));
        assert_eq!(CellValue::from(1.5).as_f64(), Some(1.5));
        assert_eq!(CellValue::from("a").as_i64(), None);
    }
}
