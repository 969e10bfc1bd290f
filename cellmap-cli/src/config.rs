//! Configuration loading for the admin CLI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use cellmap_core::RegistryConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "CELLMAP_CONFIG";

/// Upper bound for `store.map_size_mb` (1 TiB).
pub const MAX_MAP_SIZE_MB: usize = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    pub store: StoreConfig,
    pub registry: RegistryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Required for the `lmdb` backend
    pub path: Option<PathBuf>,
    pub map_size_mb: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Lmdb,
    /// Lives for one invocation only
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` overrides it
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or CELLMAP_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Invalid registry config: {0}")]
    Registry(#[from] cellmap_core::ConfigError),
}

impl AdminConfig {
    /// Load from `explicit`, falling back to `CELLMAP_CONFIG`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(config_path_from_env)
            .ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Lmdb {
            match &self.store.path {
                Some(path) if !path.as_os_str().is_empty() => {}
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "store.path",
                        reason: "required for the lmdb backend".to_string(),
                    })
                }
            }
        }
        if self.store.map_size_mb == 0 || self.store.map_size_mb > MAX_MAP_SIZE_MB {
            return Err(ConfigError::InvalidValue {
                field: "store.map_size_mb",
                reason: format!("must be between 1 and {}", MAX_MAP_SIZE_MB),
            });
        }
        self.registry.validate()?;
        if let Err(e) = EnvFilter::try_new(&self.log.filter) {
            return Err(ConfigError::InvalidValue {
                field: "log.filter",
                reason: e.to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
