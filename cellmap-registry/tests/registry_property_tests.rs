//! Property-Based Tests for the Mapping Registry
//!
//! - get(put(m)) reproduces m exactly
//! - listing reflects exactly the stored mappings

use cellmap_core::{KeyType, Mapping, RegistryConfig};
use cellmap_registry::MappingRegistry;
use cellmap_storage::MockStore;
use cellmap_test_utils::generators::{arb_mapping, arb_name};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_put_then_get_is_identity(mapping in arb_mapping()) {
        let registry = MappingRegistry::new(MockStore::new(), RegistryConfig::standard()).unwrap();
        registry.put(&mapping, false).unwrap();
        let loaded = registry.get(mapping.table_name(), mapping.mapping_name()).unwrap();
        prop_assert_eq!(loaded, mapping);
    }

    #[test]
    fn prop_overwrite_replaces_whole_definition(first in arb_mapping(), second in arb_mapping()) {
        let registry = MappingRegistry::new(MockStore::new(), RegistryConfig::standard()).unwrap();
        registry.put(&first, false).unwrap();

        let replacement = Mapping::builder(
            first.table_name(),
            first.mapping_name(),
            second.key_name(),
            second.key_type(),
        )
        .build();
        registry.put(&replacement, true).unwrap();
        let loaded = registry.get(first.table_name(), first.mapping_name()).unwrap();
        prop_assert_eq!(loaded, replacement);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_listing_matches_stored_pairs(
        pairs in prop::collection::btree_set((arb_name(), arb_name()), 0..12),
        batch in 1usize..5,
    ) {
        let mut config = RegistryConfig::standard();
        config.scan_batch_size = batch;
        let registry = MappingRegistry::new(MockStore::new(), config).unwrap();

        let mut expected: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (table, name) in &pairs {
            let mapping = Mapping::builder(table.as_str(), name.as_str(), "id", KeyType::Long).build();
            registry.put(&mapping, false).unwrap();
            expected.entry(table.clone()).or_default().push(name.clone());
        }

        let tables: BTreeSet<String> = expected.keys().cloned().collect();
        prop_assert_eq!(registry.list_tables().unwrap(), tables);
        for (table, names) in &expected {
            prop_assert_eq!(&registry.list_mappings(table).unwrap(), names);
        }
    }
}
