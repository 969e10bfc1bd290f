//! Configuration types

use crate::{ConfigError, SEPARATOR};
use serde::{Deserialize, Serialize};

/// Default name of the table holding persisted mappings.
pub const DEFAULT_MAPPING_TABLE: &str = "pentaho_mappings";

/// Mapping registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Table that stores one row per mapping
    pub mapping_table: String,
    /// Rows requested per scan round-trip when listing mappings
    pub scan_batch_size: usize,
}

impl RegistryConfig {
    /// The conventional registry layout.
    pub fn standard() -> Self {
        Self {
            mapping_table: DEFAULT_MAPPING_TABLE.to_string(),
            scan_batch_size: 100,
        }
    }

    pub fn with_mapping_table(mut self, table: impl Into<String>) -> Self {
        self.mapping_table = table.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mapping_table.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "mapping_table".to_string(),
            });
        }
        if self.mapping_table.contains(SEPARATOR) {
            return Err(ConfigError::InvalidValue {
                field: "mapping_table".to_string(),
                value: self.mapping_table.clone(),
                reason: format!("must not contain '{}'", SEPARATOR),
            });
        }
        if self.scan_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan_batch_size".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
