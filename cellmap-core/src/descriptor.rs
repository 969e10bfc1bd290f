//! Column descriptors and their persisted type-name vocabulary

use crate::{ColumnType, MappingError};
use serde::Serialize;

/// Describes one mapped column: where it lives in the store and how its
/// bytes are interpreted.
///
/// `labels` is present iff the type is `IndexedString`, and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    family: String,
    qualifier: String,
    alias: String,
    column_type: ColumnType,
    is_wide: bool,
    labels: Option<Vec<String>>,
}

impl ColumnDescriptor {
    /// Create a descriptor for any type except `IndexedString`.
    ///
    /// Integer and floating columns default to the wide (64-bit) form.
    pub fn new(
        family: impl Into<String>,
        qualifier: impl Into<String>,
        alias: impl Into<String>,
        column_type: ColumnType,
    ) -> Result<Self, MappingError> {
        let alias = alias.into();
        if column_type == ColumnType::IndexedString {
            return Err(MappingError::MissingLabels { alias });
        }
        Ok(Self {
            family: family.into(),
            qualifier: qualifier.into(),
            alias,
            column_type,
            is_wide: column_type.has_width(),
            labels: None,
        })
    }

    /// Create an indexed (enumerated) string column with a fixed label set.
    /// Labels are trimmed and must be distinct, since a cell stores the
    /// label text and decodes back to its first position.
    pub fn indexed(
        family: impl Into<String>,
        qualifier: impl Into<String>,
        alias: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<Self, MappingError> {
        let alias = alias.into();
        if labels.is_empty() {
            return Err(MappingError::MissingLabels { alias });
        }
        let labels: Vec<String> = labels.into_iter().map(|l| l.trim().to_string()).collect();
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(MappingError::InvalidName {
                    field: "label".to_string(),
                    value: label.clone(),
                    reason: "duplicate label".to_string(),
                });
            }
        }
        Ok(Self {
            family: family.into(),
            qualifier: qualifier.into(),
            alias,
            column_type: ColumnType::IndexedString,
            is_wide: false,
            labels: Some(labels),
        })
    }

    /// Select the 64-bit (`true`) or 32-bit (`false`) form. Ignored for
    /// types without a width variant.
    pub fn with_wide(mut self, is_wide: bool) -> Self {
        if self.column_type.has_width() {
            self.is_wide = is_wide;
        }
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_wide(&self) -> bool {
        self.is_wide
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Ordinal of `label` within the label set, if this is an indexed column.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.iter().position(|l| l == label))
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        self.alias = alias;
    }

    /// Persisted type name.
    ///
    /// Integer columns are written as `Integer`/`Long` and floating columns
    /// as `Float`/`Double` so the width survives a round trip; indexed
    /// columns are written as `{label1,label2,...}`.
    pub fn type_name(&self) -> String {
        match self.column_type {
            ColumnType::String => "String".to_string(),
            ColumnType::IndexedString => {
                let labels = self.labels.as_deref().unwrap_or_default();
                format!("{{{}}}", labels.join(","))
            }
            ColumnType::Integer if self.is_wide => "Long".to_string(),
            ColumnType::Integer => "Integer".to_string(),
            ColumnType::Float if self.is_wide => "Double".to_string(),
            ColumnType::Float => "Float".to_string(),
            ColumnType::Date => "Date".to_string(),
            ColumnType::Boolean => "Boolean".to_string(),
            ColumnType::BigDecimal => "BigNumber".to_string(),
            ColumnType::SerializedBlob => "Serializable".to_string(),
            ColumnType::RawBinary => "Binary".to_string(),
        }
    }

    /// Rebuild a descriptor from its persisted type name.
    ///
    /// Matching is case-insensitive; any name starting with `date` is a date
    /// column.
    pub fn from_type_name(
        family: impl Into<String>,
        qualifier: impl Into<String>,
        alias: impl Into<String>,
        type_name: &str,
    ) -> Result<Self, MappingError> {
        let alias = alias.into();
        if type_name.starts_with('{') && type_name.ends_with('}') {
            let labels = parse_label_set(type_name, &alias)?;
            return Self::indexed(family, qualifier, alias, labels);
        }

        let (column_type, is_wide) = match type_name.to_ascii_lowercase().as_str() {
            "string" => (ColumnType::String, false),
            "integer" => (ColumnType::Integer, false),
            "long" => (ColumnType::Integer, true),
            "float" => (ColumnType::Float, false),
            "double" => (ColumnType::Float, true),
            "boolean" => (ColumnType::Boolean, false),
            "bignumber" => (ColumnType::BigDecimal, false),
            "serializable" => (ColumnType::SerializedBlob, false),
            "binary" => (ColumnType::RawBinary, false),
            lower if lower.starts_with("date") => (ColumnType::Date, false),
            _ => {
                return Err(MappingError::UnknownType {
                    type_name: type_name.to_string(),
                })
            }
        };
        Ok(Self::new(family, qualifier, alias, column_type)?.with_wide(is_wide))
    }
}

/// Parse `{a,b,c}` into trimmed labels.
fn parse_label_set(type_name: &str, alias: &str) -> Result<Vec<String>, MappingError> {
    let inner = &type_name[1..type_name.len() - 1];
    if inner.trim().is_empty() {
        return Err(MappingError::MissingLabels {
            alias: alias.to_string(),
        });
    }
    let labels: Vec<String> = inner.split(',').map(|l| l.trim().to_string()).collect();
    if labels.iter().any(|l| l.is_empty()) {
        return Err(MappingError::InvalidName {
            field: "label".to_string(),
            value: type_name.to_string(),
            reason: "labels must not be empty".to_string(),
        });
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_indexed_requires_labels() {
        let err = ColumnDescriptor::indexed("f", "q", "a", vec![]).unwrap_err();
        assert_eq!(err, MappingError::MissingLabels { alias: "a".into() });

        let err = ColumnDescriptor::new("f", "q", "a", ColumnType::IndexedString).unwrap_err();
        assert!(matches!(err, MappingError::MissingLabels { .. }));
    }

    #[test]
    fn test_indexed_rejects_duplicate_labels() {
        for set in [&["a", "a"][..], &["a", "b", " a"][..]] {
            assert!(matches!(
                ColumnDescriptor::indexed("f", "q", "a", labels(set)).unwrap_err(),
                MappingError::InvalidName { ref reason, .. } if reason == "duplicate label"
            ));
        }
        assert!(ColumnDescriptor::from_type_name("f", "q", "a", "{x,y,x}").is_err());
    }

    #[test]
    fn test_width_defaults_and_overrides() {
        let long = ColumnDescriptor::new("f", "q", "a", ColumnType::Integer).unwrap();
        assert!(long.is_wide());
        assert_eq!(long.type_name(), "Long");

        let int = long.with_wide(false);
        assert_eq!(int.type_name(), "Integer");

        let float = ColumnDescriptor::new("f", "q", "a", ColumnType::Float)
            .unwrap()
            .with_wide(false);
        assert_eq!(float.type_name(), "Float");

        let string = ColumnDescriptor::new("f", "q", "a", ColumnType::String)
            .unwrap()
            .with_wide(true);
        assert!(!string.is_wide());
    }

    #[test]
    fn test_type_name_for_indexed() {
        let d = ColumnDescriptor::indexed("f", "q", "a", labels(&["a", " b", "c "])).unwrap();
        assert_eq!(d.type_name(), "{a,b,c}");
        assert_eq!(d.label_index("c"), Some(2));
        assert_eq!(d.label_index("d"), None);
    }

    #[test]
    fn test_from_type_name_every_spelling() {
        let cases = [
            ("String", ColumnType::String, false),
            ("integer", ColumnType::Integer, false),
            ("LONG", ColumnType::Integer, true),
            ("Float", ColumnType::Float, false),
            ("Double", ColumnType::Float, true),
            ("Date", ColumnType::Date, false),
            ("date yyyy-MM-dd", ColumnType::Date, false),
            ("Boolean", ColumnType::Boolean, false),
            ("BigNumber", ColumnType::BigDecimal, false),
            ("Serializable", ColumnType::SerializedBlob, false),
            ("Binary", ColumnType::RawBinary, false),
        ];
        for (name, column_type, wide) in cases {
            let d = ColumnDescriptor::from_type_name("f", "q", "a", name).unwrap();
            assert_eq!(d.column_type(), column_type, "type for {}", name);
            assert_eq!(d.is_wide(), wide, "width for {}", name);
        }
    }

    #[test]
    fn test_from_type_name_label_set() {
        let d = ColumnDescriptor::from_type_name("f", "q", "a", "{nomVal1, nomVal2,nomVal3}")
            .unwrap();
        assert_eq!(d.column_type(), ColumnType::IndexedString);
        assert_eq!(
            d.labels().unwrap(),
            &labels(&["nomVal1", "nomVal2", "nomVal3"])[..]
        );
    }

    #[test]
    fn test_from_type_name_rejects_unknown_and_empty_sets() {
        assert_eq!(
            ColumnDescriptor::from_type_name("f", "q", "a", "Varchar").unwrap_err(),
            MappingError::UnknownType {
                type_name: "Varchar".into()
            }
        );
        assert!(matches!(
            ColumnDescriptor::from_type_name("f", "q", "a", "{}").unwrap_err(),
            MappingError::MissingLabels { .. }
        ));
        assert!(matches!(
            ColumnDescriptor::from_type_name("f", "q", "a", "{a,,b}").unwrap_err(),
            MappingError::InvalidName { .. }
        ));
    }

    #[test]
    fn test_type_name_roundtrip_all_types() {
        for column_type in ColumnType::ALL {
            let original = if column_type == ColumnType::IndexedString {
                ColumnDescriptor::indexed("f", "q", "a", labels(&["x", "y"])).unwrap()
            } else {
                ColumnDescriptor::new("f", "q", "a", column_type).unwrap()
            };
            for wide in [false, true] {
                let d = original.clone().with_wide(wide);
                let parsed = ColumnDescriptor::from_type_name("f", "q", "a", &d.type_name()).unwrap();
                assert_eq!(parsed, d);
            }
        }
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_column_type() -> impl Strategy<Value = ColumnType> {
        proptest::sample::select(ColumnType::ALL.to_vec())
    }

    fn arb_label_set() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::btree_set("[A-Za-z0-9_]{1,8}", 1..6)
            .prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The persisted type name rebuilds the same descriptor.
        #[test]
        fn prop_type_name_roundtrip(
            column_type in arb_column_type(),
            wide in any::<bool>(),
            labels in arb_label_set(),
        ) {
            let descriptor = if column_type == ColumnType::IndexedString {
                ColumnDescriptor::indexed("f", "q", "a", labels).unwrap()
            } else {
                ColumnDescriptor::new("f", "q", "a", column_type).unwrap().with_wide(wide)
            };
            let parsed = ColumnDescriptor::from_type_name("f", "q", "a", &descriptor.type_name()).unwrap();
            prop_assert_eq!(parsed, descriptor);
        }

        /// Label lookup returns the position each label was declared at.
        #[test]
        fn prop_label_index_matches_position(labels in arb_label_set()) {
            let descriptor = ColumnDescriptor::indexed("f", "q", "a", labels.clone()).unwrap();
            for (i, label) in labels.iter().enumerate() {
                prop_assert_eq!(descriptor.label_index(label), Some(i));
            }
        }
    }
}
