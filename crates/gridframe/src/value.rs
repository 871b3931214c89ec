#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single cell in a [`DataFrame`](crate::DataFrame).
///
/// Cells are untyped at the table level: a column may hold integers, floats
/// and text side by side (row import coerces each cell independently, so an
/// inconsistent source can produce a mixed column). [`Value::Missing`] is the
/// explicit marker for absent data.
///
/// The enum uses an explicit `{type, value}` tagged layout for stable
/// serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE-754 double precision number.
    Float(f64),
    /// Plain text.
    Text(String),
    /// Missing / absent cell.
    Missing,
}

impl Value {
    /// Coerce one textual cell, the way row-oriented import does it: try
    /// integer first, then float, otherwise keep the text as-is. The empty
    /// string is the textual rendering of [`Value::Missing`].
    ///
    /// Coercion is per-cell; columns built from inconsistent text end up
    /// mixed-typed.
    pub fn parse(text: &str) -> Value {
        if text.is_empty() {
            return Value::Missing;
        }
        if let Ok(v) = text.parse::<i64>() {
            return Value::Int(v);
        }
        if let Ok(v) = text.parse::<f64>() {
            return Value::Float(v);
        }
        Value::Text(text.to_owned())
    }

    /// Returns true if the value is [`Value::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell: `Some` for `Int` (widened) and `Float`,
    /// `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) | Value::Missing => None,
        }
    }

    /// Total order over cells, used by sorting.
    ///
    /// Numbers compare numerically across `Int`/`Float` (floats via
    /// [`f64::total_cmp`], so NaN is ordered rather than dropped), text
    /// compares lexicographically, and the kinds rank numbers < text <
    /// missing. Missing compares equal to itself, which keeps stable sorts
    /// stable in the presence of absent data.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Missing, Value::Missing) => Ordering::Equal,
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::Text(_) => 1,
            Value::Missing => 2,
        }
    }
}

/// Renders the cell as row-oriented text. Floats keep their decimal point
/// (`4.0`, not `4`) so an exported float re-imports as a float; missing
/// cells render empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Text(v) => f.write_str(v),
            Value::Missing => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}
