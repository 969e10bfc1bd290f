//! Persisted layout of one mapping row.
//!
//! - row key: `table,mapping` through the String key codec
//! - `key` family: one cell, qualifier `key_name` (plain mapping) or
//!   `key_name,families` (tuple mapping, families may be empty),
//!   value = key type name
//! - `columns` family: qualifier `family,qualifier,alias`, value = type name

use cellmap_codec::encode_key;
use cellmap_core::{
    CellValue, CellmapResult, ColumnDescriptor, KeyType, Mapping, MappingError, Row, SEPARATOR,
};

/// Family holding one cell per mapped column.
pub const COLUMNS_FAMILY: &str = "columns";
/// Family holding the key name and type.
pub const KEY_FAMILY: &str = "key";

/// Encoded registry row key for `(table, mapping)`.
pub fn row_key(table: &str, mapping: &str) -> CellmapResult<Vec<u8>> {
    check_name("table name", table)?;
    check_name("mapping name", mapping)?;
    let compound = CellValue::String(format!("{}{}{}", table, SEPARATOR, mapping));
    Ok(encode_key(Some(&compound), KeyType::String)?)
}

/// Split a registry row key into `(table, mapping)`.
pub fn split_row_key(key: &[u8]) -> Option<(String, String)> {
    let text = std::str::from_utf8(key).ok()?;
    let (table, mapping) = text.split_once(SEPARATOR)?;
    Some((table.to_string(), mapping.to_string()))
}

/// Reject names that are empty or would corrupt a compound key.
///
/// Surrounding whitespace is rejected too, so a stored key always splits
/// back into exactly the names it was written with.
pub fn check_name(field: &str, value: &str) -> Result<(), MappingError> {
    let reason = if value.trim().is_empty() {
        "must not be empty"
    } else if value.trim() != value {
        "must not have surrounding whitespace"
    } else if value.contains(SEPARATOR) {
        "must not contain ','"
    } else {
        return Ok(());
    };
    Err(MappingError::InvalidName {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    })
}

/// Check every name the persisted form embeds in a compound string.
pub fn check_mapping_names(mapping: &Mapping) -> Result<(), MappingError> {
    check_name("table name", mapping.table_name())?;
    check_name("mapping name", mapping.mapping_name())?;
    check_name("key name", mapping.key_name())?;
    if let Some(families) = mapping.tuple_families() {
        if families.contains(SEPARATOR) {
            return Err(MappingError::InvalidName {
                field: "tuple families".to_string(),
                value: families.to_string(),
                reason: "must not contain ','".to_string(),
            });
        }
    }
    for column in mapping.columns().values() {
        check_name("column family", column.family())?;
        check_name("column name", column.qualifier())?;
        check_name("alias", column.alias())?;
        for label in column.labels().unwrap_or_default() {
            check_name("label", label)?;
        }
    }
    Ok(())
}

/// `(qualifier, value)` of the key cell.
pub fn key_cell(mapping: &Mapping) -> (String, String) {
    let mut qualifier = mapping.key_name().to_string();
    if mapping.is_tuple_mapping() {
        qualifier.push_str(SEPARATOR);
        qualifier.push_str(mapping.tuple_families().unwrap_or_default());
    }
    (qualifier, mapping.key_type().as_db_str().to_string())
}

/// `(qualifier, value)` of a column cell.
pub fn column_cell(alias: &str, column: &ColumnDescriptor) -> (String, String) {
    let qualifier = [column.family(), column.qualifier(), alias].join(SEPARATOR);
    (qualifier, column.type_name())
}

/// Rebuild a mapping from its persisted row.
pub fn parse_row(table: &str, mapping_name: &str, row: &Row) -> CellmapResult<Mapping> {
    let compound = format!("{}{}{}", table, SEPARATOR, mapping_name);
    let malformed = |reason: String| MappingError::MalformedRegistryRow {
        row: compound.clone(),
        reason,
    };

    let key_cells = row.family(KEY_FAMILY).map(|cells| cells.len()).unwrap_or(0);
    let (key_qualifier, key_value) = match row.family(KEY_FAMILY) {
        Some(cells) if cells.len() == 1 => cells
            .iter()
            .next()
            .ok_or_else(|| malformed("key family is empty".to_string()))?,
        _ => {
            return Err(malformed(format!(
                "expected exactly one key definition, found {}",
                key_cells
            ))
            .into())
        }
    };
    let key_qualifier = utf8(key_qualifier).map_err(&malformed)?;
    let key_type = KeyType::from_db_str(utf8(key_value).map_err(&malformed)?)?;

    let mut builder = match key_qualifier.split_once(SEPARATOR) {
        Some((key_name, families)) => {
            Mapping::builder(table, mapping_name, key_name, key_type).tuple(Some(families.to_string()))
        }
        None => Mapping::builder(table, mapping_name, key_qualifier, key_type),
    };

    if let Some(cells) = row.family(COLUMNS_FAMILY) {
        for (qualifier, value) in cells {
            let qualifier = utf8(qualifier).map_err(&malformed)?;
            let parts: Vec<&str> = qualifier.splitn(3, SEPARATOR).collect();
            let [family, column, alias] = parts[..] else {
                return Err(malformed(format!(
                    "column qualifier \"{}\" is not family,column,alias",
                    qualifier
                ))
                .into());
            };
            let type_name = utf8(value).map_err(&malformed)?;
            let descriptor = ColumnDescriptor::from_type_name(family, column, alias, type_name)?;
            builder.add_column(descriptor)?;
        }
    }
    Ok(builder.build())
}

fn utf8(bytes: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))
}
