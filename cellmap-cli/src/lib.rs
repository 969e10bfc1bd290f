//! cellmap Admin CLI
//!
//! Library half of the `cellmap-admin` binary: configuration, logging
//! setup and command execution against any
//! [`StoreAdmin`](cellmap_storage::StoreAdmin).

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use commands::{run, Args, Command};
pub use config::{AdminConfig, StoreBackend};
pub use error::CliError;
