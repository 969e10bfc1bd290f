//! Fuzz test for persisted type-name parsing
//!
//! Covers both the column type vocabulary and the key type names stored in
//! the mapping table. A name that parses must print back to a name that
//! parses to the same descriptor.
//!
//! Run with: cargo +nightly fuzz run type_name_fuzz -- -max_total_time=60

#![no_main]

use cellmap_core::{ColumnDescriptor, KeyType};
use cellmap_registry::layout::check_name;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(key_type) = KeyType::from_db_str(name) {
        assert_eq!(KeyType::from_db_str(key_type.as_db_str()), Ok(key_type));
    }

    if let Ok(column) = ColumnDescriptor::from_type_name("f", "q", "a", name) {
        let labels_ok = column
            .labels()
            .unwrap_or_default()
            .iter()
            .all(|label| check_name("label", label).is_ok());
        if labels_ok {
            let reparsed = ColumnDescriptor::from_type_name("f", "q", "a", &column.type_name());
            assert_eq!(reparsed.as_ref(), Ok(&column), "type name {:?}", name);
        }
    }
});
