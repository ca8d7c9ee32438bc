//! Filter row and filter set state model
//!
//! A [`FilterRow`] is one user-specified predicate (field key, operator,
//! values, optional unit). A [`FilterSet`] is the ordered collection of rows
//! being edited or confirmed. All state transitions go through the methods
//! here; they enforce the shape rules so invalid combinations cannot be
//! constructed:
//!
//! - changing a row's key resets operator, values and unit to the new field's
//!   defaults, so values of one kind never leak into a field of another kind
//! - ordering operators are only accepted on numeric fields
//! - value cardinality is clamped to the field's kind
//! - a non-empty key can appear on at most one row of a set
//! - a set never grows beyond the catalog's field count

use crate::catalog::{self, FieldSpec, Operator, ValueKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unknown operator code: '{0}'. Valid codes are: in, ge, le")]
    UnknownOperator(String),
}

/// One filter value. The persisted form is a plain JSON scalar, so this is an
/// untagged union of the three shapes a field can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FilterValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Number(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

/// A single filter row. An empty `key` marks the row as unset; unset rows are
/// kept in the editing session but never transformed or persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRow {
    pub key: String,
    pub operator: Operator,
    pub values: Vec<FilterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl FilterRow {
    /// Catalog entry for this row's key, if the key is known
    pub fn spec(&self) -> Option<&'static FieldSpec> {
        catalog::lookup(&self.key)
    }

    /// Change the row's field. Resets operator, values and unit to the new
    /// field's defaults. Unknown non-empty keys are ignored; an empty key
    /// returns the row to the unset state.
    pub fn set_key(&mut self, new_key: &str) {
        if new_key.is_empty() {
            *self = FilterRow::default();
            return;
        }
        let Some(spec) = catalog::lookup(new_key) else {
            return;
        };
        self.key = spec.key.to_string();
        self.operator = spec.default_operator;
        self.values = match spec.kind {
            ValueKind::Boolean => vec![FilterValue::Bool(true)],
            _ => Vec::new(),
        };
        self.unit = spec.default_unit.map(str::to_string);
    }

    /// Change the operator. Ignored unless the row's field permits it, which
    /// in practice limits the ordering operators to numeric fields.
    pub fn set_operator(&mut self, op: Operator) {
        if self.spec().is_some_and(|spec| spec.allows_operator(op)) {
            self.operator = op;
        }
    }

    /// Replace the row's values, clamped to the field's cardinality:
    /// multi-value fields keep the whole sequence, single-value fields keep
    /// at most the first entry. Rows without a known field hold no values.
    pub fn set_values(&mut self, values: Vec<FilterValue>) {
        match self.spec() {
            Some(spec) => {
                self.values = values;
                if !spec.kind.is_multi() {
                    self.values.truncate(1);
                }
            }
            None => self.values.clear(),
        }
    }

    /// Whether this row contributes to transform/encode output
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.values.is_empty()
    }
}

/// An ordered collection of filter rows.
///
/// Serializes transparently as a JSON array of rows, which is the persisted
/// URL payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    rows: Vec<FilterRow>,
}

impl Default for FilterSet {
    /// A set holding a single unset row, the state shown when no filters are
    /// active
    fn default() -> Self {
        FilterSet {
            rows: vec![FilterRow::default()],
        }
    }
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw rows, as restored by the codec. Rows are kept
    /// verbatim so a re-opened editing session shows exactly what was saved.
    pub fn from_rows(rows: Vec<FilterRow>) -> Self {
        FilterSet { rows }
    }

    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&FilterRow> {
        self.rows.get(index)
    }

    /// Whether another row may be added. False once every catalog field could
    /// be in use; the add affordance should be hidden then.
    pub fn can_add_row(&self) -> bool {
        self.rows.len() < catalog::field_count()
    }

    /// Append an unset row. No-op at the row cap.
    pub fn add_row(&mut self) {
        if self.can_add_row() {
            self.rows.push(FilterRow::default());
        }
    }

    /// Remove the row at `index`. Out-of-range indexes are ignored.
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Change the field of the row at `index`. Keys already used by another
    /// row are refused, which keeps non-empty keys unique across the set.
    pub fn set_key(&mut self, index: usize, new_key: &str) {
        if !new_key.is_empty() {
            let taken = self
                .rows
                .iter()
                .enumerate()
                .any(|(i, row)| i != index && row.key == new_key);
            if taken {
                return;
            }
        }
        if let Some(row) = self.rows.get_mut(index) {
            row.set_key(new_key);
        }
    }

    pub fn set_operator(&mut self, index: usize, op: Operator) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_operator(op);
        }
    }

    pub fn set_values(&mut self, index: usize, values: Vec<FilterValue>) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_values(values);
        }
    }

    /// Field keys still selectable for the row at `current_index`: all catalog
    /// keys minus those used by *other* rows. The row's own key stays in the
    /// list so re-selecting it does not lock the row.
    pub fn available_keys(&self, current_index: usize) -> Vec<&'static str> {
        catalog::keys()
            .filter(|key| {
                !self
                    .rows
                    .iter()
                    .enumerate()
                    .any(|(i, row)| i != current_index && row.key == *key)
            })
            .collect()
    }

    /// The confirm step: keep only complete rows. Falls back to the default
    /// single-row set when nothing survives, so the result is never empty.
    pub fn validated(&self) -> FilterSet {
        let rows: Vec<FilterRow> = self
            .rows
            .iter()
            .filter(|row| row.is_complete())
            .cloned()
            .collect();
        if rows.is_empty() {
            FilterSet::default()
        } else {
            FilterSet { rows }
        }
    }
}
