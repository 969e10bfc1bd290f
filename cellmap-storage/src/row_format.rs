//! JSON encoding of a row's cells as one LMDB value.
//!
//! Qualifiers are raw bytes, so families are stored as ordered pair lists
//! rather than JSON objects.

use cellmap_core::{FamilyCells, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) type Families = BTreeMap<String, FamilyCells>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredRow {
    families: Vec<(String, Vec<(Vec<u8>, Vec<u8>)>)>,
}

impl From<&Families> for StoredRow {
    fn from(families: &Families) -> Self {
        Self {
            families: families
                .iter()
                .map(|(family, cells)| {
                    let cells = cells.iter().map(|(q, v)| (q.clone(), v.clone())).collect();
                    (family.clone(), cells)
                })
                .collect(),
        }
    }
}

impl From<StoredRow> for Families {
    fn from(row: StoredRow) -> Self {
        row.families
            .into_iter()
            .map(|(family, cells)| (family, cells.into_iter().collect::<FamilyCells>()))
            .collect()
    }
}

pub(crate) fn encode(families: &Families) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(&StoredRow::from(families)).map_err(|e| StoreError::Backend {
        reason: format!("failed to serialize row value: {}", e),
    })
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Families, StoreError> {
    let row: StoredRow = serde_json::from_slice(bytes).map_err(|e| StoreError::Backend {
        reason: format!("corrupt row value: {}", e),
    })?;
    Ok(row.into())
}
