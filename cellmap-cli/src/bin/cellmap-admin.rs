//! cellmap-admin entry point.

use cellmap_cli::config::ConfigError;
use cellmap_cli::{logging, run, AdminConfig, Args, CliError, StoreBackend};
use cellmap_registry::MappingRegistry;
use cellmap_storage::{LmdbStore, MockStore};
use clap::Parser;
use std::io::Write;

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    let config = AdminConfig::load(args.config.as_deref())?;
    logging::init(&config.log)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.store.backend {
        StoreBackend::Lmdb => {
            let path = config.store.path.as_ref().ok_or(ConfigError::InvalidValue {
                field: "store.path",
                reason: "required for the lmdb backend".to_string(),
            })?;
            let store = LmdbStore::open(path, config.store.map_size_mb)?;
            let registry = MappingRegistry::new(store, config.registry.clone())?;
            run(&registry, &args.command, &mut out)?;
        }
        StoreBackend::Memory => {
            tracing::warn!("memory backend selected; nothing outlives this command");
            let registry = MappingRegistry::new(MockStore::new(), config.registry.clone())?;
            run(&registry, &args.command, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}
