//! End-to-end command runs against an LMDB directory.
//!
//! Each command opens the store afresh, the way separate invocations of
//! the binary would.

use cellmap_cli::{run, Command};
use cellmap_core::RegistryConfig;
use cellmap_registry::MappingRegistry;
use cellmap_storage::LmdbStore;
use std::path::Path;
use tempfile::TempDir;

fn invoke(dir: &Path, command: Command) -> String {
    let store = LmdbStore::open(dir, 32).expect("store should open");
    let registry = MappingRegistry::new(store, RegistryConfig::standard()).expect("valid config");
    let mut out = Vec::new();
    run(&registry, &command, &mut out).expect("command should succeed");
    String::from_utf8(out).expect("output is UTF-8")
}

#[test]
fn test_state_persists_between_invocations() {
    let dir = TempDir::new().unwrap();

    invoke(dir.path(), Command::CreateRegistry);
    invoke(
        dir.path(),
        Command::CreateSampleTable {
            table: "sample".into(),
            rows: 30,
        },
    );
    invoke(
        dir.path(),
        Command::CreateSampleMapping {
            table: "sample".into(),
            mapping: "all".into(),
            overwrite: false,
        },
    );

    assert_eq!(invoke(dir.path(), Command::ListTables), "sample\n");

    let described = invoke(
        dir.path(),
        Command::Describe {
            table: "sample".into(),
            mapping: "all".into(),
        },
    );
    assert!(described.contains("KEY (MyKey): Long"));
    assert!(described.contains("first_indexed_column (Family2,first_indexed_column): {nomVal1,nomVal2,nomVal3}"));

    let scanned = invoke(
        dir.path(),
        Command::Scan {
            table: "sample".into(),
            mapping: "all".into(),
            limit: 100,
        },
    );
    assert_eq!(scanned.lines().count(), 30);
    assert!(scanned.lines().last().unwrap_or_default().starts_with("-471\t"));

    let deleted = invoke(
        dir.path(),
        Command::Delete {
            table: "sample".into(),
            mapping: "all".into(),
        },
    );
    assert!(deleted.starts_with("Deleted"));
    assert_eq!(invoke(dir.path(), Command::ListTables), "");
}

#[test]
fn test_create_registry_twice_fails() {
    let dir = TempDir::new().unwrap();
    invoke(dir.path(), Command::CreateRegistry);

    let store = LmdbStore::open(dir.path(), 32).unwrap();
    let registry = MappingRegistry::new(store, RegistryConfig::standard()).unwrap();
    let mut out = Vec::new();
    assert!(run(&registry, &Command::CreateRegistry, &mut out).is_err());
}
