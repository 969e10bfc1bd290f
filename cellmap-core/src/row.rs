//! Raw store rows as seen through the administrative shim

use std::collections::BTreeMap;

/// Qualifier -> value cells of one column family.
pub type FamilyCells = BTreeMap<Vec<u8>, Vec<u8>>;

/// One row: its key and every cell grouped by column family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub key: Vec<u8>,
    pub families: BTreeMap<String, FamilyCells>,
}

impl Row {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            families: BTreeMap::new(),
        }
    }

    /// Look up a single cell.
    pub fn cell(&self, family: &str, qualifier: &[u8]) -> Option<&[u8]> {
        self.families
            .get(family)
            .and_then(|cells| cells.get(qualifier))
            .map(Vec::as_slice)
    }

    /// Cells of one family, if present.
    pub fn family(&self, family: &str) -> Option<&FamilyCells> {
        self.families.get(family)
    }

    /// Insert or replace a cell.
    pub fn set_cell(&mut self, family: impl Into<String>, qualifier: Vec<u8>, value: Vec<u8>) {
        self.families
            .entry(family.into())
            .or_default()
            .insert(qualifier, value);
    }

    pub fn is_empty(&self) -> bool {
        self.families.values().all(BTreeMap::is_empty)
    }

    pub fn cell_count(&self) -> usize {
        self.families.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_cells() {
        let mut row = Row::new(b"k".to_vec());
        assert!(row.is_empty());
        row.set_cell("f", b"q1".to_vec(), b"v1".to_vec());
        row.set_cell("f", b"q2".to_vec(), b"v2".to_vec());
        row.set_cell("f", b"q1".to_vec(), b"v3".to_vec());

        assert_eq!(row.cell("f", b"q1"), Some(&b"v3"[..]));
        assert_eq!(row.cell("g", b"q1"), None);
        assert_eq!(row.cell_count(), 2);
        assert!(!row.is_empty());
    }
}
