//! Fuzz test for the row key decoder
//!
//! Any byte string either decodes or is rejected; decoded keys re-encode to
//! the same bytes.
//!
//! Run with: cargo +nightly fuzz run key_decode_fuzz -- -max_total_time=60

#![no_main]

use cellmap_codec::{decode_key, encode_key};
use cellmap_core::KeyType;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, key)) = data.split_first() else {
        return;
    };
    let key_type = KeyType::ALL[selector as usize % KeyType::ALL.len()];

    if let Ok(value) = decode_key(key, key_type) {
        if let Ok(bytes) = encode_key(Some(&value), key_type) {
            assert_eq!(bytes, key, "{:?} key did not round trip", key_type);
        }
    }
});
