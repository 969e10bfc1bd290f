//! cellmap Storage - Store Administrative Shim
//!
//! The [`StoreAdmin`] trait is the only boundary the mapping layer crosses
//! to reach a sorted key-value store. Two implementations ship here:
//! - [`MockStore`]: in-memory, for tests and throwaway sessions
//! - [`LmdbStore`]: persistent, backed by LMDB through heed
//!
//! Row keys are ordered by unsigned lexicographic byte comparison in both.

pub mod lmdb;
pub mod mock;
mod row_format;

pub use lmdb::LmdbStore;
pub use mock::MockStore;

use cellmap_core::{Row, StoreError};
use std::collections::VecDeque;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Administrative and data operations against a sorted, column-family
/// oriented key-value store.
///
/// Calls are synchronous and may be slow; no timeout or retry is applied
/// here. Callers own that policy.
pub trait StoreAdmin: Send + Sync {
    /// Whether `table` exists.
    fn table_exists(&self, table: &str) -> StoreResult<bool>;

    /// Create `table` with the given column families.
    fn create_table(&self, table: &str, families: &[&str]) -> StoreResult<()>;

    fn is_table_disabled(&self, table: &str) -> StoreResult<bool>;

    fn enable_table(&self, table: &str) -> StoreResult<()>;

    fn disable_table(&self, table: &str) -> StoreResult<()>;

    /// Drop `table` and every row in it.
    fn delete_table(&self, table: &str) -> StoreResult<()>;

    /// Fetch up to `limit` rows with `start <= key < stop`, in key order.
    /// Absent bounds are open.
    fn fetch_rows(
        &self,
        table: &str,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<Row>>;

    /// Write a single cell, creating the row if needed.
    fn put(
        &self,
        table: &str,
        key: &[u8],
        family: &str,
        qualifier: &[u8],
        value: &[u8],
    ) -> StoreResult<()>;

    /// Remove a row. Removing an absent row is not an error.
    fn delete_row(&self, table: &str, key: &[u8]) -> StoreResult<()>;

    /// Lazily page through `start <= key < stop`, `batch_size` rows per
    /// round-trip.
    fn scan(
        &self,
        table: &str,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
        batch_size: usize,
    ) -> RowScanner<'_, Self>
    where
        Self: Sized,
    {
        RowScanner::new(self, table, start, stop, batch_size)
    }

    /// Fetch one row by key.
    fn get_row(&self, table: &str, key: &[u8]) -> StoreResult<Option<Row>> {
        let mut rows = self.fetch_rows(table, Some(key), None, 1)?;
        Ok(rows.pop().filter(|row| row.key == key))
    }

    fn row_exists(&self, table: &str, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get_row(table, key)?.is_some())
    }
}

// ============================================================================
// ROW SCANNER
// ============================================================================

/// Iterator over a key range, fetching rows in batches.
///
/// Yields `Err` at most once; iteration ends after an error.
pub struct RowScanner<'a, S: ?Sized> {
    store: &'a S,
    table: String,
    next_start: Option<Vec<u8>>,
    stop: Option<Vec<u8>>,
    batch_size: usize,
    buffer: VecDeque<Row>,
    exhausted: bool,
}

impl<'a, S: StoreAdmin + ?Sized> RowScanner<'a, S> {
    /// Usable with trait objects, where [`StoreAdmin::scan`] is not.
    pub fn new(
        store: &'a S,
        table: &str,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            table: table.to_string(),
            next_start: start.map(<[u8]>::to_vec),
            stop: stop.map(<[u8]>::to_vec),
            batch_size: batch_size.max(1),
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn refill(&mut self) -> StoreResult<()> {
        let rows = self.store.fetch_rows(
            &self.table,
            self.next_start.as_deref(),
            self.stop.as_deref(),
            self.batch_size,
        )?;
        if rows.len() < self.batch_size {
            self.exhausted = true;
        }
        if let Some(last) = rows.last() {
            // Smallest key strictly greater than the last one returned.
            let mut next = last.key.clone();
            next.push(0);
            self.next_start = Some(next);
        }
        tracing::debug!(table = %self.table, fetched = rows.len(), "scan batch");
        self.buffer.extend(rows);
        Ok(())
    }
}

impl<'a, S: StoreAdmin + ?Sized> Iterator for RowScanner<'a, S> {
    type Item = StoreResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.refill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
