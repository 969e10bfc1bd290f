//! The `Mapping` schema object and its builder

use crate::{ColumnDescriptor, KeyType, MappingError, TUPLE_FAMILY_SEPARATOR};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Describes how a store table's row key and a subset of its cells map to
/// typed, named application fields.
///
/// Identified by `(table_name, mapping_name)`. Columns are keyed by alias;
/// aliases and `(family, qualifier)` pairs are unique and no alias equals
/// the key name. Those invariants are enforced by [`MappingBuilder`], the
/// only way to add columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    table_name: String,
    mapping_name: String,
    key_name: String,
    key_type: KeyType,
    is_tuple_mapping: bool,
    tuple_families: Option<String>,
    columns: BTreeMap<String, ColumnDescriptor>,
}

impl Mapping {
    /// Start building a mapping.
    pub fn builder(
        table_name: impl Into<String>,
        mapping_name: impl Into<String>,
        key_name: impl Into<String>,
        key_type: KeyType,
    ) -> MappingBuilder {
        MappingBuilder::new(table_name, mapping_name, key_name, key_type)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn mapping_name(&self) -> &str {
        &self.mapping_name
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn is_tuple_mapping(&self) -> bool {
        self.is_tuple_mapping
    }

    /// Raw tuple family list as persisted (families joined by `:`).
    pub fn tuple_families(&self) -> Option<&str> {
        self.tuple_families.as_deref()
    }

    /// Tuple families split into individual names. Empty means "all families".
    pub fn tuple_family_list(&self) -> Vec<&str> {
        self.tuple_families
            .as_deref()
            .map(|s| {
                s.split(TUPLE_FAMILY_SEPARATOR)
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mapped columns by alias, in alias order.
    pub fn columns(&self) -> &BTreeMap<String, ColumnDescriptor> {
        &self.columns
    }

    pub fn column(&self, alias: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(alias)
    }

    /// Find the column mapped to a `(family, qualifier)` pair.
    pub fn column_for(&self, family: &str, qualifier: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .values()
            .find(|c| c.family() == family && c.qualifier() == qualifier)
    }

    /// Distinct column families referenced by mapped columns.
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = self.columns.values().map(|c| c.family()).collect();
        families.sort_unstable();
        families.dedup();
        families
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mapping \"{}\" on table \"{}\":",
            self.mapping_name, self.table_name
        )?;
        writeln!(f)?;
        writeln!(f, "\tKEY ({}): {}", self.key_name, self.key_type)?;
        if self.is_tuple_mapping {
            match self.tuple_families.as_deref() {
                Some(families) if !families.is_empty() => {
                    writeln!(f, "\tTUPLE mapping over families: {}", families)?
                }
                _ => writeln!(f, "\tTUPLE mapping over all families")?,
            }
        }
        writeln!(f)?;
        for (alias, column) in &self.columns {
            writeln!(
                f,
                "\t{} ({},{}): {}",
                alias,
                column.family(),
                column.qualifier(),
                column.type_name()
            )?;
        }
        Ok(())
    }
}

/// Builds a [`Mapping`], enforcing its invariants on every added column.
#[derive(Debug, Clone)]
pub struct MappingBuilder {
    mapping: Mapping,
}

impl MappingBuilder {
    pub fn new(
        table_name: impl Into<String>,
        mapping_name: impl Into<String>,
        key_name: impl Into<String>,
        key_type: KeyType,
    ) -> Self {
        Self {
            mapping: Mapping {
                table_name: table_name.into(),
                mapping_name: mapping_name.into(),
                key_name: key_name.into(),
                key_type,
                is_tuple_mapping: false,
                tuple_families: None,
                columns: BTreeMap::new(),
            },
        }
    }

    /// Mark the mapping as a tuple mapping, optionally restricted to the
    /// given families (joined by `:`).
    pub fn tuple(mut self, families: Option<String>) -> Self {
        self.mapping.is_tuple_mapping = true;
        self.mapping.tuple_families = families.filter(|f| !f.trim().is_empty());
        self
    }

    /// Add a column, returning the alias it was stored under.
    ///
    /// A colliding alias is renamed by appending or incrementing a numeric
    /// suffix (`x` -> `x_1` -> `x_2`). A `(family, qualifier)` pair that is
    /// already mapped is rejected.
    pub fn add_column(&mut self, mut column: ColumnDescriptor) -> Result<String, MappingError> {
        if column.alias().trim().is_empty() {
            return Err(MappingError::InvalidName {
                field: "alias".to_string(),
                value: column.alias().to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if column.alias() == self.mapping.key_name {
            return Err(MappingError::AliasMatchesKey {
                alias: column.alias().to_string(),
            });
        }
        if self
            .mapping
            .column_for(column.family(), column.qualifier())
            .is_some()
        {
            return Err(MappingError::DuplicateColumn {
                family: column.family().to_string(),
                qualifier: column.qualifier().to_string(),
            });
        }

        if self.mapping.columns.contains_key(column.alias()) {
            let renamed = self.next_free_alias(column.alias());
            column.set_alias(renamed);
        }

        let alias = column.alias().to_string();
        self.mapping.columns.insert(alias.clone(), column);
        Ok(alias)
    }

    /// Chaining form of [`add_column`](Self::add_column).
    pub fn with_column(mut self, column: ColumnDescriptor) -> Result<Self, MappingError> {
        self.add_column(column)?;
        Ok(self)
    }

    pub fn build(self) -> Mapping {
        self.mapping
    }

    fn next_free_alias(&self, alias: &str) -> String {
        let (mut base, mut suffix) = split_numeric_suffix(alias);
        loop {
            suffix = match suffix.checked_add(1) {
                Some(next) => next,
                // `x_<u64::MAX>`: number from the full alias instead
                None => {
                    base = alias;
                    1
                }
            };
            let candidate = format!("{}_{}", base, suffix);
            if !self.mapping.columns.contains_key(&candidate) && candidate != self.mapping.key_name
            {
                return candidate;
            }
        }
    }
}

/// `"x_3"` -> `("x", 3)`, `"x"` -> `("x", 0)`.
fn split_numeric_suffix(alias: &str) -> (&str, u64) {
    if let Some((base, digits)) = alias.rsplit_once('_') {
        if !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = digits.parse::<u64>() {
                return (base, n);
            }
        }
    }
    (alias, 0)
}
