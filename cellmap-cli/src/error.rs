//! Error types for the admin CLI.

use crate::config::ConfigError;
use cellmap_core::{CellmapError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cellmap(#[from] CellmapError),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Cellmap(e.into())
    }
}
