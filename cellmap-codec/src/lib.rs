//! cellmap Codec - Key, Value and Comparator Encoding
//!
//! Byte-level encoding for mapped rows:
//! - [`key`]: sort-preserving row-key codec (sign-bit flip for signed types)
//! - [`value`]: per-column value codec
//! - [`fallback`]: ordered boolean/decimal decoder chains
//! - [`comparator`]: deserializing comparators for push-down filters
//! - [`row`]: whole-row helpers built on the above

pub mod comparator;
pub mod fallback;
pub mod key;
pub mod row;
pub mod value;

pub use comparator::{compare, matches, try_compare, CompareOp, ComparatorConfig, NumericReference};
pub use key::{decode_key, encode_key};
pub use row::{decode_row, decode_tuples, DecodedRow, EncodedCell, EncodedRow, RowEncoder, TupleRecord};
pub use value::{decode_column, encode_column};
