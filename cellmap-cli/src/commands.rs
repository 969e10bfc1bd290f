//! Subcommands and their execution against a registry.

use crate::error::CliError;
use cellmap_codec::{decode_row, decode_tuples};
use cellmap_core::{CellValue, Mapping};
use cellmap_registry::{create_sample_table, sample_mapping, MappingRegistry};
use cellmap_storage::StoreAdmin;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cellmap-admin")]
#[command(about = "Administer stored schema mappings", long_about = None)]
pub struct Args {
    /// TOML configuration file. Falls back to CELLMAP_CONFIG.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List every table that has at least one mapping.
    ListTables,
    /// List the mappings stored for a table.
    ListMappings {
        #[arg(long)]
        table: String,
    },
    /// Print a stored mapping.
    Describe {
        #[arg(long)]
        table: String,
        #[arg(long)]
        mapping: String,
    },
    /// Remove a stored mapping.
    Delete {
        #[arg(long)]
        table: String,
        #[arg(long)]
        mapping: String,
    },
    /// Create the mapping table.
    CreateRegistry,
    /// Drop and recreate a table filled with sample rows of every column type.
    CreateSampleTable {
        #[arg(long)]
        table: String,
        #[arg(long, default_value_t = 1000)]
        rows: usize,
    },
    /// Store the mapping that decodes a sample table.
    CreateSampleMapping {
        #[arg(long)]
        table: String,
        #[arg(long)]
        mapping: String,
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Decode rows of a table through a stored mapping.
    Scan {
        #[arg(long)]
        table: String,
        #[arg(long)]
        mapping: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

/// Execute `command`, writing human-readable output to `out`.
pub fn run<S: StoreAdmin, W: Write>(
    registry: &MappingRegistry<S>,
    command: &Command,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Command::ListTables => {
            for table in registry.list_tables()? {
                writeln!(out, "{}", table)?;
            }
        }
        Command::ListMappings { table } => {
            for mapping in registry.list_mappings(table)? {
                writeln!(out, "{}", mapping)?;
            }
        }
        Command::Describe { table, mapping } => {
            write!(out, "{}", registry.describe(table, mapping)?)?;
        }
        Command::Delete { table, mapping } => {
            if registry.delete(table, mapping)? {
                writeln!(out, "Deleted mapping \"{}\" for table \"{}\"", mapping, table)?;
            } else {
                writeln!(out, "No mapping \"{}\" for table \"{}\"", mapping, table)?;
            }
        }
        Command::CreateRegistry => {
            registry.create_mapping_table()?;
            writeln!(out, "Created mapping table \"{}\"", registry.config().mapping_table)?;
        }
        Command::CreateSampleTable { table, rows } => {
            create_sample_table(registry.store(), table, *rows)?;
            writeln!(out, "Created sample table \"{}\" with {} rows", table, rows)?;
        }
        Command::CreateSampleMapping {
            table,
            mapping,
            overwrite,
        } => {
            let sample = sample_mapping(table, mapping).map_err(cellmap_core::CellmapError::from)?;
            registry.put(&sample, *overwrite)?;
            writeln!(out, "Stored mapping \"{}\" for table \"{}\"", mapping, table)?;
        }
        Command::Scan {
            table,
            mapping,
            limit,
        } => {
            let mapping = registry.get(table, mapping)?;
            let batch = registry.config().scan_batch_size.min(*limit).max(1);
            for row in registry.store().scan(table, None, None, batch).take(*limit) {
                let row = row?;
                if mapping.is_tuple_mapping() {
                    for record in decode_tuples(&mapping, &row)? {
                        writeln!(
                            out,
                            "{}\t{}:{}\t{}",
                            record.key,
                            record.family,
                            record.column,
                            hex::encode(&record.value)
                        )?;
                    }
                } else {
                    let decoded = decode_row(&mapping, &row)?;
                    let fields: Vec<String> = decoded
                        .values
                        .iter()
                        .filter_map(|(alias, value)| {
                            value
                                .as_ref()
                                .map(|v| format!("{}={}", alias, render(&mapping, alias, v)))
                        })
                        .collect();
                    writeln!(out, "{}\t{}", decoded.key, fields.join("\t"))?;
                }
            }
        }
    }
    Ok(())
}

/// Display form of a decoded value; indexed cells show their label.
fn render(mapping: &Mapping, alias: &str, value: &CellValue) -> String {
    match value {
        CellValue::Indexed(ordinal) => mapping
            .column(alias)
            .and_then(|c| c.labels())
            .and_then(|labels| labels.get(*ordinal))
            .cloned()
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
