//! LMDB-backed store.
//!
//! Uses heed over a single unnamed database. Two disjoint key spaces live
//! in it:
//!
//! - catalog: `0x00 ++ table` -> JSON table metadata (families, disabled)
//! - rows: `0x01 ++ u32 table_len ++ table ++ row_key` -> encoded cells
//!
//! The length prefix keeps each table's rows contiguous, so a table scan is
//! a single LMDB range in row-key order.

use crate::row_format::{self, Families};
use crate::{StoreAdmin, StoreResult};
use cellmap_core::{Row, StoreError};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Bound;
use std::path::Path;

const CATALOG_PREFIX: u8 = 0x00;
const ROW_PREFIX: u8 = 0x01;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TableMeta {
    families: Vec<String>,
    disabled: bool,
}

/// Persistent store on an LMDB environment.
pub struct LmdbStore {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl fmt::Debug for LmdbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LmdbStore")
            .field("path", &self.env.path())
            .finish()
    }
}

fn backend(e: impl fmt::Display) -> StoreError {
    StoreError::Backend {
        reason: e.to_string(),
    }
}

fn catalog_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + table.len());
    key.push(CATALOG_PREFIX);
    key.extend_from_slice(table.as_bytes());
    key
}

fn row_prefix(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(5 + table.len());
    key.push(ROW_PREFIX);
    key.extend_from_slice(&(table.len() as u32).to_be_bytes());
    key.extend_from_slice(table.as_bytes());
    key
}

fn row_key(table: &str, row: &[u8]) -> Vec<u8> {
    let mut key = row_prefix(table);
    key.extend_from_slice(row);
    key
}

impl LmdbStore {
    /// Open or create a store at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory holding the LMDB files; created if missing
    /// * `map_size_mb` - Maximum size of the memory map in megabytes
    pub fn open(path: impl AsRef<Path>, map_size_mb: usize) -> StoreResult<Self> {
        let map_size = map_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| StoreError::Backend {
                reason: format!("map size of {} MB overflows usize", map_size_mb),
            })?;
        std::fs::create_dir_all(path.as_ref()).map_err(backend)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(backend)?;

        let mut wtxn = env.write_txn().map_err(backend)?;
        let db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, None).map_err(backend)?;
        wtxn.commit().map_err(backend)?;

        tracing::debug!(path = %path.as_ref().display(), map_size_mb, "opened LMDB store");
        Ok(Self { env, db })
    }

    fn meta(&self, rtxn: &RoTxn, table: &str) -> StoreResult<Option<TableMeta>> {
        match self.db.get(rtxn, &catalog_key(table)).map_err(backend)? {
            Some(bytes) => serde_json::from_slice(bytes).map(Some).map_err(backend),
            None => Ok(None),
        }
    }

    fn require_meta(&self, rtxn: &RoTxn, table: &str) -> StoreResult<TableMeta> {
        self.meta(rtxn, table)?.ok_or_else(|| StoreError::TableNotFound {
            table: table.to_string(),
        })
    }

    fn require_enabled(&self, rtxn: &RoTxn, table: &str) -> StoreResult<TableMeta> {
        let meta = self.require_meta(rtxn, table)?;
        if meta.disabled {
            return Err(StoreError::TableDisabled {
                table: table.to_string(),
            });
        }
        Ok(meta)
    }

    fn set_disabled(&self, table: &str, disabled: bool) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let mut meta = self.require_meta(&wtxn, table)?;
        meta.disabled = disabled;
        let bytes = serde_json::to_vec(&meta).map_err(backend)?;
        self.db.put(&mut wtxn, &catalog_key(table), &bytes).map_err(backend)?;
        wtxn.commit().map_err(backend)
    }

    /// Keys of every row stored for `table`.
    fn collect_row_keys(&self, rtxn: &RoTxn, table: &str) -> StoreResult<Vec<Vec<u8>>> {
        let prefix = row_prefix(table);
        let mut keys = Vec::new();
        for result in self.db.prefix_iter(rtxn, &prefix).map_err(backend)? {
            let (key, _) = result.map_err(backend)?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }
}

impl StoreAdmin for LmdbStore {
    fn table_exists(&self, table: &str) -> StoreResult<bool> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        Ok(self.meta(&rtxn, table)?.is_some())
    }

    fn create_table(&self, table: &str, families: &[&str]) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        if self.meta(&wtxn, table)?.is_some() {
            return Err(StoreError::TableExists {
                table: table.to_string(),
            });
        }
        let meta = TableMeta {
            families: families.iter().map(|f| f.to_string()).collect(),
            disabled: false,
        };
        let bytes = serde_json::to_vec(&meta).map_err(backend)?;
        self.db.put(&mut wtxn, &catalog_key(table), &bytes).map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        tracing::debug!(table, ?families, "created table");
        Ok(())
    }

    fn is_table_disabled(&self, table: &str) -> StoreResult<bool> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        Ok(self.require_meta(&rtxn, table)?.disabled)
    }

    fn enable_table(&self, table: &str) -> StoreResult<()> {
        self.set_disabled(table, false)
    }

    fn disable_table(&self, table: &str) -> StoreResult<()> {
        self.set_disabled(table, true)
    }

    fn delete_table(&self, table: &str) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        self.require_meta(&wtxn, table)?;
        let keys = self.collect_row_keys(&wtxn, table)?;
        for key in &keys {
            self.db.delete(&mut wtxn, key).map_err(backend)?;
        }
        self.db.delete(&mut wtxn, &catalog_key(table)).map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        tracing::debug!(table, rows = keys.len(), "deleted table");
        Ok(())
    }

    fn fetch_rows(
        &self,
        table: &str,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<Row>> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        self.require_enabled(&rtxn, table)?;

        if let (Some(start), Some(stop)) = (start, stop) {
            if start >= stop {
                return Ok(Vec::new());
            }
        }

        let prefix = row_prefix(table);
        let lower = row_key(table, start.unwrap_or_default());
        let upper = stop.map(|stop| row_key(table, stop));
        let range = (
            Bound::Included(lower.as_slice()),
            upper.as_deref().map_or(Bound::Unbounded, Bound::Excluded),
        );

        let mut rows = Vec::new();
        for result in self.db.range(&rtxn, &range).map_err(backend)? {
            if rows.len() >= limit {
                break;
            }
            let (key, value) = result.map_err(backend)?;
            if !key.starts_with(&prefix) {
                break;
            }
            rows.push(Row {
                key: key[prefix.len()..].to_vec(),
                families: row_format::decode(value)?,
            });
        }
        Ok(rows)
    }

    fn put(
        &self,
        table: &str,
        key: &[u8],
        family: &str,
        qualifier: &[u8],
        value: &[u8],
    ) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let meta = self.require_enabled(&wtxn, table)?;
        if !meta.families.iter().any(|f| f == family) {
            return Err(StoreError::UnknownFamily {
                table: table.to_string(),
                family: family.to_string(),
            });
        }

        let storage_key = row_key(table, key);
        let mut families = match self.db.get(&wtxn, &storage_key).map_err(backend)? {
            Some(existing) => row_format::decode(existing)?,
            None => Families::new(),
        };
        families
            .entry(family.to_string())
            .or_default()
            .insert(qualifier.to_vec(), value.to_vec());

        let encoded = row_format::encode(&families)?;
        self.db.put(&mut wtxn, &storage_key, &encoded).map_err(backend)?;
        wtxn.commit().map_err(backend)
    }

    fn delete_row(&self, table: &str, key: &[u8]) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        self.require_enabled(&wtxn, table)?;
        self.db.delete(&mut wtxn, &row_key(table, key)).map_err(backend)?;
        wtxn.commit().map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (LmdbStore, TempDir) {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let store = LmdbStore::open(temp_dir.path(), 10).expect("store creation should succeed");
        (store, temp_dir)
    }

    #[test]
    fn test_tables_do_not_bleed_into_each_other() {
        let (store, _dir) = create_test_store();
        store.create_table("a", &["f"]).unwrap();
        store.create_table("ab", &["f"]).unwrap();
        store.put("a", b"\xff", "f", b"q", b"1").unwrap();
        store.put("ab", b"\x00", "f", b"q", b"2").unwrap();

        let rows = store.fetch_rows("a", None, None, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, b"\xff");
        assert_eq!(store.fetch_rows("ab", None, None, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_put_merges_cells_into_row() {
        let (store, _dir) = create_test_store();
        store.create_table("t", &["f", "g"]).unwrap();
        store.put("t", b"k", "f", b"q1", b"v1").unwrap();
        store.put("t", b"k", "g", b"q2", b"v2").unwrap();
        store.put("t", b"k", "f", b"q1", b"v3").unwrap();

        let row = store.get_row("t", b"k").unwrap().unwrap();
        assert_eq!(row.cell("f", b"q1"), Some(&b"v3"[..]));
        assert_eq!(row.cell("g", b"q2"), Some(&b"v2"[..]));
        assert_eq!(row.cell_count(), 2);
    }

    #[test]
    fn test_open_rejects_overflowing_map_size() {
        let temp_dir = TempDir::new().unwrap();
        let err = LmdbStore::open(temp_dir.path(), usize::MAX / 1024).unwrap_err();
        assert!(matches!(err, StoreError::Backend { .. }));
    }

    #[test]
    fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = LmdbStore::open(temp_dir.path(), 10).unwrap();
            store.create_table("t", &["f"]).unwrap();
            store.put("t", b"k", "f", b"q", b"v").unwrap();
            store.disable_table("t").unwrap();
        }
        let store = LmdbStore::open(temp_dir.path(), 10).unwrap();
        assert!(store.table_exists("t").unwrap());
        assert!(store.is_table_disabled("t").unwrap());
        store.enable_table("t").unwrap();
        assert!(store.row_exists("t", b"k").unwrap());
    }

    #[test]
    fn test_delete_table_removes_rows() {
        let (store, _dir) = create_test_store();
        store.create_table("t", &["f"]).unwrap();
        store.put("t", b"k", "f", b"q", b"v").unwrap();
        store.delete_table("t").unwrap();
        assert!(!store.table_exists("t").unwrap());

        store.create_table("t", &["f"]).unwrap();
        assert!(store.fetch_rows("t", None, None, 10).unwrap().is_empty());
    }
}
