//! The mapping registry over a [`StoreAdmin`].

use crate::layout::{self, COLUMNS_FAMILY, KEY_FAMILY};
use cellmap_core::{CellmapResult, Mapping, MappingError, RegistryConfig, SEPARATOR};
use cellmap_storage::{RowScanner, StoreAdmin};
use std::collections::BTreeSet;

/// Persists [`Mapping`]s as rows of a dedicated store table.
///
/// One row per `(table, mapping)`. Writes are not atomic across a
/// delete-then-insert overwrite; run at most one writer per mapping.
#[derive(Debug)]
pub struct MappingRegistry<S> {
    store: S,
    config: RegistryConfig,
}

impl<S: StoreAdmin> MappingRegistry<S> {
    /// Wrap `store`, validating `config` first.
    pub fn new(store: S, config: RegistryConfig) -> CellmapResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn table(&self) -> &str {
        &self.config.mapping_table
    }

    /// Create the registry table with its `columns` and `key` families.
    pub fn create_mapping_table(&self) -> CellmapResult<()> {
        if self.store.table_exists(self.table())? {
            return Err(MappingError::RegistryTableExists {
                table: self.table().to_string(),
            }
            .into());
        }
        self.store
            .create_table(self.table(), &[COLUMNS_FAMILY, KEY_FAMILY])?;
        tracing::info!(table = %self.table(), "created mapping table");
        Ok(())
    }

    /// Whether a mapping is stored for `(table, mapping)`.
    pub fn exists(&self, table: &str, mapping: &str) -> CellmapResult<bool> {
        let key = layout::row_key(table, mapping)?;
        if !self.store.table_exists(self.table())? {
            return Ok(false);
        }
        Ok(self.store.row_exists(self.table(), &key)?)
    }

    /// Store `mapping`.
    ///
    /// Fails with `AlreadyExists` if one is stored under the same
    /// `(table, mapping)` and `overwrite` is false. Otherwise the old row is
    /// removed before the new one is written.
    pub fn put(&self, mapping: &Mapping, overwrite: bool) -> CellmapResult<()> {
        layout::check_mapping_names(mapping)?;
        let key = layout::row_key(mapping.table_name(), mapping.mapping_name())?;
        self.ensure_writable()?;

        if self.store.row_exists(self.table(), &key)? {
            if !overwrite {
                return Err(MappingError::AlreadyExists {
                    table: mapping.table_name().to_string(),
                    mapping: mapping.mapping_name().to_string(),
                }
                .into());
            }
            self.store.delete_row(self.table(), &key)?;
            tracing::debug!(
                table = %mapping.table_name(),
                mapping = %mapping.mapping_name(),
                "removed previous mapping before overwrite"
            );
        }

        tracing::debug!(key = %String::from_utf8_lossy(&key), "writing mapping row");
        for (alias, column) in mapping.columns() {
            let (qualifier, type_name) = layout::column_cell(alias, column);
            self.store.put(
                self.table(),
                &key,
                COLUMNS_FAMILY,
                qualifier.as_bytes(),
                type_name.as_bytes(),
            )?;
        }
        let (qualifier, key_type) = layout::key_cell(mapping);
        self.store.put(
            self.table(),
            &key,
            KEY_FAMILY,
            qualifier.as_bytes(),
            key_type.as_bytes(),
        )?;

        tracing::info!(
            table = %mapping.table_name(),
            mapping = %mapping.mapping_name(),
            columns = mapping.columns().len(),
            overwrite,
            "stored mapping"
        );
        Ok(())
    }

    /// Load the mapping stored for `(table, mapping)`.
    pub fn get(&self, table: &str, mapping: &str) -> CellmapResult<Mapping> {
        let key = layout::row_key(table, mapping)?;
        let not_found = || MappingError::NotFound {
            table: table.to_string(),
            mapping: mapping.to_string(),
        };
        if !self.store.table_exists(self.table())? {
            return Err(not_found().into());
        }
        let row = self
            .store
            .get_row(self.table(), &key)?
            .ok_or_else(not_found)?;
        layout::parse_row(table, mapping, &row)
    }

    /// Remove the mapping for `(table, mapping)`.
    ///
    /// Returns false if the registry table or the mapping does not exist.
    pub fn delete(&self, table: &str, mapping: &str) -> CellmapResult<bool> {
        let key = layout::row_key(table, mapping)?;
        if !self.store.table_exists(self.table())? {
            return Ok(false);
        }
        if self.store.is_table_disabled(self.table())? {
            self.store.enable_table(self.table())?;
        }
        if !self.store.row_exists(self.table(), &key)? {
            return Ok(false);
        }
        self.store.delete_row(self.table(), &key)?;
        tracing::info!(table, mapping, "deleted mapping");
        Ok(true)
    }

    /// Names of all tables that have at least one mapping.
    pub fn list_tables(&self) -> CellmapResult<BTreeSet<String>> {
        let mut tables = BTreeSet::new();
        if !self.store.table_exists(self.table())? {
            return Ok(tables);
        }
        for row in self.scan(None, None) {
            let row = row?;
            match layout::split_row_key(&row.key) {
                Some((table, _)) => {
                    tables.insert(table);
                }
                None => tracing::warn!(
                    key = ?String::from_utf8_lossy(&row.key),
                    "skipping registry row without a table,mapping key"
                ),
            }
        }
        Ok(tables)
    }

    /// Names of the mappings stored for `table`, in key order.
    pub fn list_mappings(&self, table: &str) -> CellmapResult<Vec<String>> {
        layout::check_name("table name", table)?;
        if !self.store.table_exists(self.table())? {
            return Ok(Vec::new());
        }
        // Names never contain the separator, so every `table,` key sorts
        // below `table` followed by the next byte after the separator.
        let start = format!("{}{}", table, SEPARATOR).into_bytes();
        let mut stop = table.as_bytes().to_vec();
        stop.push(SEPARATOR.as_bytes()[0] + 1);

        let mut names = Vec::new();
        for row in self.scan(Some(&start), Some(&stop)) {
            let row = row?;
            if let Some((_, mapping)) = layout::split_row_key(&row.key) {
                names.push(mapping);
            }
        }
        Ok(names)
    }

    /// Human-readable listing of a stored mapping.
    pub fn describe(&self, table: &str, mapping: &str) -> CellmapResult<String> {
        Ok(self.get(table, mapping)?.to_string())
    }

    fn scan<'s>(&'s self, start: Option<&[u8]>, stop: Option<&[u8]>) -> RowScanner<'s, S> {
        RowScanner::new(
            &self.store,
            self.table(),
            start,
            stop,
            self.config.scan_batch_size,
        )
    }

    /// Create the registry table if missing and enable it if disabled.
    fn ensure_writable(&self) -> CellmapResult<()> {
        if !self.store.table_exists(self.table())? {
            self.create_mapping_table()?;
        } else if self.store.is_table_disabled(self.table())? {
            self.store.enable_table(self.table())?;
            tracing::info!(table = %self.table(), "enabled mapping table");
        }
        Ok(())
    }
}
