//! Deserializing comparators.
//!
//! Raw numeric cells are stored as plain two's-complement / IEEE bytes,
//! and booleans as tokens, so byte-lexicographic comparison gives wrong
//! answers for them. A comparator decodes the cell first and then orders
//! it against a typed reference.
//!
//! The comparator is split into a serializable [`ComparatorConfig`] and the
//! pure [`compare`] function, so a configuration can be shipped to a remote
//! filter and rebuilt there without ever existing half-initialised.

use crate::fallback::decode_boolean;
use crate::value::{decode_float, decode_integer};
use cellmap_core::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Reference number for a numeric comparator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericReference {
    /// Integer class; `wide` selects Long over Integer.
    Integer { value: i64, wide: bool },
    /// Floating class; `wide` selects Double over Float.
    Float { value: f64, wide: bool },
}

/// Serializable comparator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ComparatorConfig {
    Numeric(NumericReference),
    Boolean { reference: bool },
}

impl ComparatorConfig {
    /// Integer-class reference. A narrow reference must fit in 32 bits.
    pub fn integer(value: i64, wide: bool) -> CodecResult<Self> {
        ComparatorConfig::Numeric(NumericReference::Integer { value, wide }).validated()
    }

    /// Float-class reference. The value must be finite, and a narrow
    /// reference must stay finite as a 32-bit float.
    pub fn float(value: f64, wide: bool) -> CodecResult<Self> {
        ComparatorConfig::Numeric(NumericReference::Float { value, wide }).validated()
    }

    pub fn boolean(reference: bool) -> Self {
        ComparatorConfig::Boolean { reference }
    }

    fn validated(self) -> CodecResult<Self> {
        match self {
            ComparatorConfig::Numeric(NumericReference::Integer { value, wide: false })
                if i32::try_from(value).is_err() =>
            {
                Err(CodecError::mismatch(
                    "32-bit Integer reference",
                    format!("out-of-range value {}", value),
                ))
            }
            ComparatorConfig::Numeric(NumericReference::Float { value, wide }) => {
                let fits = if wide {
                    value.is_finite()
                } else {
                    (value as f32).is_finite()
                };
                if fits {
                    Ok(self)
                } else {
                    Err(CodecError::mismatch(
                        "finite float reference",
                        value.to_string(),
                    ))
                }
            }
            _ => Ok(self),
        }
    }

    /// The reference encoded the way the column codec would store it.
    pub fn reference_bytes(&self) -> Vec<u8> {
        match *self {
            ComparatorConfig::Numeric(NumericReference::Integer { value, wide: true }) => {
                value.to_be_bytes().to_vec()
            }
            ComparatorConfig::Numeric(NumericReference::Integer { value, wide: false }) => {
                // Constructors reject out-of-range values; saturate anything
                // built from the public variants directly.
                let narrow = i32::try_from(value)
                    .unwrap_or(if value < 0 { i32::MIN } else { i32::MAX });
                narrow.to_be_bytes().to_vec()
            }
            ComparatorConfig::Numeric(NumericReference::Float { value, wide: true }) => {
                value.to_be_bytes().to_vec()
            }
            ComparatorConfig::Numeric(NumericReference::Float { value, wide: false }) => {
                (value as f32).to_be_bytes().to_vec()
            }
            ComparatorConfig::Boolean { reference } => {
                if reference {
                    b"Y".to_vec()
                } else {
                    b"N".to_vec()
                }
            }
        }
    }

    /// Serialize for transmission to a remote filtering component.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CodecError::UndecodableBlob {
            reason: e.to_string(),
        })
    }

    /// Rebuild a configuration, applying the same checks as the constructors.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let config: Self = serde_json::from_slice(bytes).map_err(|e| CodecError::UndecodableBlob {
            reason: e.to_string(),
        })?;
        config.validated()
    }
}

/// Order a raw cell relative to the configured reference.
///
/// Decode failures cannot be surfaced through this contract: a cell that
/// does not decode (or decodes to NaN) sorts after every valid value and
/// yields `Ordering::Greater`. Use [`try_compare`] to observe the failure.
pub fn compare(config: &ComparatorConfig, cell: &[u8]) -> Ordering {
    match try_compare(config, cell) {
        Ok(ordering) => ordering,
        Err(err) => {
            tracing::warn!(
                cell_len = cell.len(),
                error = %err,
                "comparator could not decode cell, ordering it last"
            );
            Ordering::Greater
        }
    }
}

/// Fallible form of [`compare`].
pub fn try_compare(config: &ComparatorConfig, cell: &[u8]) -> CodecResult<Ordering> {
    match *config {
        ComparatorConfig::Numeric(NumericReference::Integer { value, .. }) => decode_integer(cell)
            .map(|decoded| decoded.cmp(&value))
            .ok_or_else(|| CodecError::invalid_width("integer comparator", "2, 4 or 8", cell.len())),
        ComparatorConfig::Numeric(NumericReference::Float { value, .. }) => {
            let decoded = decode_float(cell)
                .ok_or_else(|| CodecError::invalid_width("float comparator", "4 or 8", cell.len()))?;
            decoded
                .partial_cmp(&value)
                .ok_or_else(|| CodecError::mismatch("comparable float", "NaN"))
        }
        ComparatorConfig::Boolean { reference } => {
            decode_boolean(cell).map(|decoded| decoded.cmp(&reference))
        }
    }
}

/// Filter predicate operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
}

impl CompareOp {
    /// Whether `ordering` (cell relative to reference) satisfies the operator.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
            CompareOp::Greater => ordering == Ordering::Greater,
        }
    }
}

/// Evaluate `cell <op> reference`. Undecodable cells never match.
pub fn matches(op: CompareOp, config: &ComparatorConfig, cell: &[u8]) -> bool {
    match try_compare(config, cell) {
        Ok(ordering) => op.accepts(ordering),
        Err(err) => {
            tracing::debug!(error = %err, "filter skipped undecodable cell");
            false
        }
    }
}
