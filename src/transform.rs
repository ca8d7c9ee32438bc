//! Normalization of a confirmed filter set into query-ready predicates
//!
//! [`transform`] is the pure translation from the editing model to the shape
//! a query backend consumes: display keys become canonical wire identifiers
//! and size values are scaled to bytes. It never fails; rows that cannot
//! contribute (unset key, no values) are dropped rather than rejected.
//!
//! Normalization happens only here. The persisted URL form keeps the raw
//! value and unit so a restored session shows what the user originally typed.

use crate::catalog::{self, Operator};
use crate::model::{FilterSet, FilterValue};
use serde::Serialize;
use std::collections::BTreeMap;

/// One query-ready predicate: wire operator code plus normalized values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub operator: Operator,
    pub values: Vec<FilterValue>,
}

/// Query-ready output, keyed by canonical field identifier.
pub type TransformedFilters = BTreeMap<String, Predicate>;

/// Wire identifier for a display key. Unknown keys fall back to their
/// lower-cased form instead of being rejected; the set's other layers already
/// exclude rows that cannot produce values, so this only affects hand-edited
/// URLs.
pub fn wire_key(key: &str) -> String {
    match catalog::lookup(key) {
        Some(spec) => spec.wire_key.to_string(),
        None => key.to_lowercase(),
    }
}

/// Convert a filter set into query-ready predicates.
///
/// Incomplete rows are dropped; surviving rows are keyed by their wire
/// identifier. Keys are unique in any set built through the model's
/// operations, so no merge policy is needed.
pub fn transform(set: &FilterSet) -> TransformedFilters {
    let mut result = TransformedFilters::new();

    for row in set.rows() {
        if !row.is_complete() {
            continue;
        }

        let mapped = wire_key(&row.key);
        let values = if mapped == "size" {
            let multiplier = row
                .unit
                .as_deref()
                .map(catalog::unit_multiplier)
                .unwrap_or(1.0);
            row.values
                .iter()
                .map(|value| match value.as_number() {
                    Some(n) => FilterValue::Number(n * multiplier),
                    None => value.clone(),
                })
                .collect()
        } else {
            row.values.clone()
        };

        result.insert(
            mapped,
            Predicate {
                operator: row.operator,
                values,
            },
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterRow;

    fn row(key: &str, operator: Operator, values: Vec<FilterValue>, unit: Option<&str>) -> FilterRow {
        FilterRow {
            key: key.to_string(),
            operator,
            values,
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn test_size_values_scale_to_bytes() {
        let set = FilterSet::from_rows(vec![row(
            "Size",
            Operator::GreaterOrEqual,
            vec![5.0.into()],
            Some("GiB"),
        )]);

        let out = transform(&set);
        let size = &out["size"];
        assert_eq!(size.operator, Operator::GreaterOrEqual);
        assert_eq!(size.values, vec![FilterValue::Number(5.0 * 1_073_741_824.0)]);
    }

    #[test]
    fn test_size_without_unit_passes_through() {
        let set = FilterSet::from_rows(vec![row(
            "Size",
            Operator::LessOrEqual,
            vec![42.0.into()],
            None,
        )]);
        assert_eq!(transform(&set)["size"].values, vec![FilterValue::Number(42.0)]);
    }

    #[test]
    fn test_non_numeric_size_values_pass_through() {
        // Should not occur through the model's operations, but restored URLs
        // can carry anything.
        let set = FilterSet::from_rows(vec![row(
            "Size",
            Operator::GreaterOrEqual,
            vec!["big".into(), 1.0.into()],
            Some("MiB"),
        )]);
        let values = &transform(&set)["size"].values;
        assert_eq!(values[0], FilterValue::Text("big".to_string()));
        assert_eq!(values[1], FilterValue::Number(1_048_576.0));
    }

    #[test]
    fn test_keys_map_to_wire_identifiers() {
        let set = FilterSet::from_rows(vec![
            row("Status", Operator::Equals, vec!["Online".into()], None),
            row("Parent ID", Operator::Equals, vec!["P-0".into(), "P-1".into()], None),
            row("Activated", Operator::Equals, vec![true.into()], None),
        ]);

        let out = transform(&set);
        assert_eq!(out.len(), 3);
        assert!(out.contains_key("status"));
        assert!(out.contains_key("parent_id"));
        assert!(out.contains_key("activated"));
    }

    #[test]
    fn test_unknown_key_falls_back_to_lowercase() {
        let set = FilterSet::from_rows(vec![row(
            "Throughput",
            Operator::Equals,
            vec![9.0.into()],
            None,
        )]);
        assert!(transform(&set).contains_key("throughput"));
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let set = FilterSet::from_rows(vec![
            FilterRow::default(),
            row("Size", Operator::GreaterOrEqual, vec![], Some("GiB")),
            row("Status", Operator::Equals, vec!["Failed".into()], None),
        ]);

        let out = transform(&set);
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("status"));
    }

    #[test]
    fn test_transform_is_pure() {
        let set = FilterSet::from_rows(vec![row(
            "Size",
            Operator::GreaterOrEqual,
            vec![2.0.into()],
            Some("TiB"),
        )]);
        let first = transform(&set);
        let second = transform(&set);
        assert_eq!(first, second);
        // The input set is untouched: the raw value and unit survive.
        assert_eq!(set.rows()[0].values, vec![FilterValue::Number(2.0)]);
        assert_eq!(set.rows()[0].unit.as_deref(), Some("TiB"));
    }

    #[test]
    fn test_empty_default_set_transforms_to_nothing() {
        assert!(transform(&FilterSet::default()).is_empty());
    }
}
