//! Field value types and type-aware comparison

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A polymorphic scalar held by a row field
///
/// Variant order matters for untagged deserialization: integers are tried
/// before floats, and every JSON string stays a `String`. Timestamps only
/// come from typed construction (`FieldValue::from(DateTime<Utc>)`), so text
/// that happens to look like a date is never reinterpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Null,
}

/// 2^63, the smallest float above `i64::MAX`
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Exact order between an integer and a float (`None` for NaN)
fn cmp_int_float(i: i64, x: f64) -> Option<Ordering> {
    if x.is_nan() {
        return None;
    }
    if x >= I64_UPPER {
        return Some(Ordering::Less);
    }
    if x < -I64_UPPER {
        return Some(Ordering::Greater);
    }

    let whole = x.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(x - whole)),
        ord => Some(ord),
    }
}

/// The comparable kind of a field value
///
/// Integers and floats share the `Number` kind so a numeric column may mix them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Boolean,
    Number,
    DateTime,
    Text,
    Null,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::DateTime => "datetime",
            FieldKind::Text => "text",
            FieldKind::Null => "null",
        };
        f.write_str(name)
    }
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Get the value as a timestamp if possible
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Integer(_) | FieldValue::Float(_) => FieldKind::Number,
            FieldValue::DateTime(_) => FieldKind::DateTime,
            FieldValue::String(_) => FieldKind::Text,
            FieldValue::Null => FieldKind::Null,
        }
    }

    /// Exact numeric order
    ///
    /// Integers are never widened to `f64`, so values beyond 2^53 keep their
    /// precision. `None` when either side is not a number or is NaN.
    pub fn numeric_cmp(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => cmp_int_float(*a, *b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => {
                cmp_int_float(*b, *a).map(Ordering::reverse)
            }
            _ => None,
        }
    }

    /// Type-aware equality
    ///
    /// Numbers compare numerically across integer and float (`3 == 3.0`), but a
    /// number never equals a string holding the same digits. NaN equals nothing.
    pub fn strict_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a == b,
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Null, FieldValue::Null) => true,
            _ => self.numeric_cmp(other) == Some(Ordering::Equal),
        }
    }

    /// Total order between two values of the same kind
    ///
    /// Returns `None` when the kinds differ. Strings use ordinal (code point)
    /// order, independent of locale.
    pub fn compare_same_kind(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.as_str().cmp(b.as_str())),
            (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => {
                    Some(self.numeric_cmp(other).unwrap_or_else(|| a.total_cmp(&b)))
                }
                _ => None,
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
