//! In-memory store for tests and throwaway sessions

use crate::{StoreAdmin, StoreResult};
use cellmap_core::{FamilyCells, Row, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct TableState {
    families: BTreeSet<String>,
    disabled: bool,
    rows: BTreeMap<Vec<u8>, BTreeMap<String, FamilyCells>>,
}

/// In-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    tables: Arc<RwLock<BTreeMap<String, TableState>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in `table`, or 0 if it does not exist.
    pub fn row_count(&self, table: &str) -> usize {
        self.read()
            .map(|tables| tables.get(table).map_or(0, |t| t.rows.len()))
            .unwrap_or(0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, TableState>>> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, TableState>>> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }
}

fn lookup<'t>(
    tables: &'t BTreeMap<String, TableState>,
    table: &str,
) -> StoreResult<&'t TableState> {
    tables.get(table).ok_or_else(|| StoreError::TableNotFound {
        table: table.to_string(),
    })
}

fn lookup_mut<'t>(
    tables: &'t mut BTreeMap<String, TableState>,
    table: &str,
) -> StoreResult<&'t mut TableState> {
    tables.get_mut(table).ok_or_else(|| StoreError::TableNotFound {
        table: table.to_string(),
    })
}

fn ensure_enabled(state: &TableState, table: &str) -> StoreResult<()> {
    if state.disabled {
        return Err(StoreError::TableDisabled {
            table: table.to_string(),
        });
    }
    Ok(())
}

impl StoreAdmin for MockStore {
    fn table_exists(&self, table: &str) -> StoreResult<bool> {
        Ok(self.read()?.contains_key(table))
    }

    fn create_table(&self, table: &str, families: &[&str]) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.contains_key(table) {
            return Err(StoreError::TableExists {
                table: table.to_string(),
            });
        }
        let state = TableState {
            families: families.iter().map(|f| f.to_string()).collect(),
            ..TableState::default()
        };
        tables.insert(table.to_string(), state);
        Ok(())
    }

    fn is_table_disabled(&self, table: &str) -> StoreResult<bool> {
        let tables = self.read()?;
        Ok(lookup(&tables, table)?.disabled)
    }

    fn enable_table(&self, table: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        lookup_mut(&mut tables, table)?.disabled = false;
        Ok(())
    }

    fn disable_table(&self, table: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        lookup_mut(&mut tables, table)?.disabled = true;
        Ok(())
    }

    fn delete_table(&self, table: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.to_string(),
            })
    }

    fn fetch_rows(
        &self,
        table: &str,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<Row>> {
        let tables = self.read()?;
        let state = lookup(&tables, table)?;
        ensure_enabled(state, table)?;

        if let (Some(start), Some(stop)) = (start, stop) {
            if start >= stop {
                return Ok(Vec::new());
            }
        }
        let lower = start.map_or(Bound::Unbounded, Bound::Included);
        let upper = stop.map_or(Bound::Unbounded, Bound::Excluded);

        Ok(state
            .rows
            .range::<[u8], _>((lower, upper))
            .take(limit)
            .map(|(key, families)| Row {
                key: key.clone(),
                families: families.clone(),
            })
            .collect())
    }

    fn put(
        &self,
        table: &str,
        key: &[u8],
        family: &str,
        qualifier: &[u8],
        value: &[u8],
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        let state = lookup_mut(&mut tables, table)?;
        ensure_enabled(state, table)?;
        if !state.families.contains(family) {
            return Err(StoreError::UnknownFamily {
                table: table.to_string(),
                family: family.to_string(),
            });
        }
        state
            .rows
            .entry(key.to_vec())
            .or_default()
            .entry(family.to_string())
            .or_default()
            .insert(qualifier.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete_row(&self, table: &str, key: &[u8]) -> StoreResult<()> {
        let mut tables = self.write()?;
        let state = lookup_mut(&mut tables, table)?;
        ensure_enabled(state, table)?;
        state.rows.remove(key);
        Ok(())
    }
}
