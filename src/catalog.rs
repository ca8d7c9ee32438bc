//! Static catalog of filterable fields
//!
//! The catalog is the closed set of fields a filter row can target, together
//! with each field's value shape, allowed operators and units. It is defined
//! once at compile time; there is no way to register fields at runtime.
//!
//! Lookups of unknown keys return `None` and every consumer treats that as
//! "unsupported" rather than an error, so stale keys restored from an old URL
//! degrade to inert rows instead of failing the whole set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::ModelError;

/// Comparison operator attached to a filter row.
///
/// Serializes as its wire code (`in`, `ge`, `le`), which is also the form the
/// URL codec persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Operator {
    /// Membership / equality (`=`)
    #[default]
    #[serde(rename = "in")]
    Equals,
    /// Greater than or equal (`≥`)
    #[serde(rename = "ge")]
    GreaterOrEqual,
    /// Less than or equal (`≤`)
    #[serde(rename = "le")]
    LessOrEqual,
}

impl Operator {
    /// Canonical code used in the persisted/query representation
    pub fn wire_code(&self) -> &'static str {
        match self {
            Operator::Equals => "in",
            Operator::GreaterOrEqual => "ge",
            Operator::LessOrEqual => "le",
        }
    }

    /// Glyph shown next to the value input
    pub fn glyph(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::GreaterOrEqual => "≥",
            Operator::LessOrEqual => "≤",
        }
    }

    /// All operators, in display order
    pub fn all() -> &'static [Operator] {
        &[
            Operator::Equals,
            Operator::GreaterOrEqual,
            Operator::LessOrEqual,
        ]
    }
}

impl FromStr for Operator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Operator::Equals),
            "ge" => Ok(Operator::GreaterOrEqual),
            "le" => Ok(Operator::LessOrEqual),
            _ => Err(ModelError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_code())
    }
}

/// Value shape of a field, which drives cardinality and operator rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// One value picked from a fixed enumeration
    SingleEnum,
    /// Any subset of a fixed enumeration
    MultiEnum,
    /// A single number, optionally scaled by a unit
    Numeric,
    /// A single on/off choice
    Boolean,
}

impl ValueKind {
    /// Whether a row of this kind may hold more than one value
    pub fn is_multi(&self) -> bool {
        matches!(self, ValueKind::MultiEnum)
    }

    /// Whether the ordering operators (`ge`/`le`) are legal for this kind
    pub fn allows_ordering(&self) -> bool {
        matches!(self, ValueKind::Numeric)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueKind::SingleEnum => "single choice",
            ValueKind::MultiEnum => "multiple choice",
            ValueKind::Numeric => "number",
            ValueKind::Boolean => "on/off",
        }
    }
}

/// Specification of one filterable field.
#[derive(Debug)]
pub struct FieldSpec {
    /// Display key, as shown in the field selector and persisted in the URL
    pub key: &'static str,
    /// Canonical identifier used in the transformed (query-ready) output
    pub wire_key: &'static str,
    pub kind: ValueKind,
    /// Allowed values for enum kinds; empty for numeric/boolean fields
    pub domain: &'static [&'static str],
    pub default_operator: Operator,
    /// Units selectable for this field; empty when the field is unitless
    pub units: &'static [&'static str],
    pub default_unit: Option<&'static str>,
}

impl FieldSpec {
    pub fn supports_unit(&self) -> bool {
        !self.units.is_empty()
    }

    /// Legal operators for this field
    pub fn operators(&self) -> &'static [Operator] {
        if self.kind.allows_ordering() {
            Operator::all()
        } else {
            &[Operator::Equals]
        }
    }

    pub fn allows_operator(&self, op: Operator) -> bool {
        self.operators().contains(&op)
    }
}

/// The full field catalog, in selector display order.
pub static CATALOG: &[FieldSpec] = &[
    FieldSpec {
        key: "Status",
        wire_key: "status",
        kind: ValueKind::MultiEnum,
        domain: &["Online", "Offline", "Rebuild", "Failed", "Missing"],
        default_operator: Operator::Equals,
        units: &[],
        default_unit: None,
    },
    FieldSpec {
        key: "Parent ID",
        wire_key: "parent_id",
        kind: ValueKind::MultiEnum,
        domain: &["P-0", "P-1", "P-2"],
        default_operator: Operator::Equals,
        units: &[],
        default_unit: None,
    },
    FieldSpec {
        key: "Size",
        wire_key: "size",
        kind: ValueKind::Numeric,
        domain: &[],
        default_operator: Operator::GreaterOrEqual,
        units: &["MiB", "GiB", "TiB", "PiB"],
        default_unit: Some("GiB"),
    },
    FieldSpec {
        key: "Activated",
        wire_key: "activated",
        kind: ValueKind::Boolean,
        domain: &["On", "Off"],
        default_operator: Operator::Equals,
        units: &[],
        default_unit: None,
    },
];

/// Look up a field by its display key
pub fn lookup(key: &str) -> Option<&'static FieldSpec> {
    CATALOG.iter().find(|spec| spec.key == key)
}

/// All field keys, in display order
pub fn keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|spec| spec.key)
}

/// Number of fields in the catalog; also the row cap for a filter set
pub fn field_count() -> usize {
    CATALOG.len()
}

/// Byte multiplier for a size unit. Unknown units scale by 1 so a stale unit
/// string restored from a URL passes values through unchanged.
pub fn unit_multiplier(unit: &str) -> f64 {
    match unit {
        "MiB" => (1u64 << 20) as f64,
        "GiB" => (1u64 << 30) as f64,
        "TiB" => (1u64 << 40) as f64,
        "PiB" => (1u64 << 50) as f64,
        _ => 1.0,
    }
}
