//! Filter engine: predicates, filter sets and row selection
//!
//! Predicates are validated when they are built, so a malformed filter fails
//! before any data is scanned. Evaluation itself never fails: a row whose field
//! is absent, null, or of the wrong kind simply does not match.

use crate::core::error::{GridError, Result};
use crate::core::field::FieldValue;
use crate::core::row::Row;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Filter operators understood by [`FilterPredicate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    InRange,
    OneOf,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::InRange => "inRange",
            FilterOperator::OneOf => "oneOf",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Equals(FieldValue),
    Contains { pattern: String, folded: String },
    InRange { min: FieldValue, max: FieldValue },
    OneOf(Vec<FieldValue>),
}

/// A single field-scoped filter condition
///
/// Built only through the validating constructors (or deserialization, which
/// runs the same checks).
///
/// # Wire format
/// ```json
/// {"operator": "equals", "value": "Approved"}
/// {"operator": "contains", "value": "robot"}
/// {"operator": "inRange", "min": 10, "max": 20}
/// {"operator": "oneOf", "values": ["Low", "Medium"]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PredicateSpec", into = "PredicateSpec")]
pub struct FilterPredicate {
    inner: Predicate,
}

impl FilterPredicate {
    /// Field value strictly equals `value` (numbers never match strings)
    pub fn equals(value: impl Into<FieldValue>) -> Result<Self> {
        let value = value.into();
        if value.is_null() {
            return Err(GridError::invalid_predicate(
                FilterOperator::Equals,
                "value must not be null",
            ));
        }
        if value.as_f64().is_some_and(f64::is_nan) {
            return Err(GridError::invalid_predicate(
                FilterOperator::Equals,
                "value must not be NaN",
            ));
        }
        Ok(Self {
            inner: Predicate::Equals(value),
        })
    }

    /// Case-insensitive substring match on text fields
    pub fn contains(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let folded = pattern.to_lowercase();
        Self {
            inner: Predicate::Contains { pattern, folded },
        }
    }

    /// Inclusive numeric range `min <= value <= max`
    ///
    /// Integer bounds stay integers, so large values compare exactly.
    pub fn in_range(min: impl Into<FieldValue>, max: impl Into<FieldValue>) -> Result<Self> {
        let bound = |name: &str, value: FieldValue| -> Result<FieldValue> {
            match value.as_f64() {
                Some(x) if !x.is_nan() => Ok(value),
                _ => Err(GridError::invalid_predicate(
                    FilterOperator::InRange,
                    format!("{} bound must be a number, got {}", name, value.kind()),
                )),
            }
        };
        let min = bound("min", min.into())?;
        let max = bound("max", max.into())?;

        if min.numeric_cmp(&max) == Some(Ordering::Greater) {
            return Err(GridError::invalid_predicate(
                FilterOperator::InRange,
                format!("min ({}) is greater than max ({})", min, max),
            ));
        }

        Ok(Self {
            inner: Predicate::InRange { min, max },
        })
    }

    /// Field value is a member of `values`
    pub fn one_of<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let values: Vec<FieldValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(GridError::invalid_predicate(
                FilterOperator::OneOf,
                "at least one value is required",
            ));
        }
        if values.iter().any(FieldValue::is_null) {
            return Err(GridError::invalid_predicate(
                FilterOperator::OneOf,
                "values must not contain null",
            ));
        }
        Ok(Self {
            inner: Predicate::OneOf(values),
        })
    }

    /// Parse a predicate from its JSON form
    pub fn from_json(value: &Value) -> Result<Self> {
        let spec: PredicateSpec = serde_json::from_value(value.clone())
            .map_err(|e| GridError::invalid_query(format!("malformed predicate: {}", e)))?;
        Self::try_from(spec)
    }

    pub fn operator(&self) -> FilterOperator {
        match self.inner {
            Predicate::Equals(_) => FilterOperator::Equals,
            Predicate::Contains { .. } => FilterOperator::Contains,
            Predicate::InRange { .. } => FilterOperator::InRange,
            Predicate::OneOf(_) => FilterOperator::OneOf,
        }
    }

    /// Evaluate against a row's field value (`None` when the field is absent)
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match &self.inner {
            Predicate::Equals(expected) => value.strict_eq(expected),
            Predicate::Contains { folded, .. } => value
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(folded.as_str())),
            Predicate::InRange { min, max } => {
                matches!(value.numeric_cmp(min), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(value.numeric_cmp(max), Some(Ordering::Less | Ordering::Equal))
            }
            Predicate::OneOf(values) => values.iter().any(|v| value.strict_eq(v)),
        }
    }
}

/// Serialized shape of a predicate, validated into [`FilterPredicate`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PredicateSpec {
    operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<FieldValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<FieldValue>,
}

impl PredicateSpec {
    fn require<T>(operator: FilterOperator, name: &str, slot: Option<T>) -> Result<T> {
        slot.ok_or_else(|| {
            GridError::invalid_predicate(operator, format!("missing '{}'", name))
        })
    }

    fn reject_extra(&self, allowed: &[&str]) -> Result<()> {
        let present = [
            ("value", self.value.is_some()),
            ("values", self.values.is_some()),
            ("min", self.min.is_some()),
            ("max", self.max.is_some()),
        ];
        match present
            .iter()
            .find(|(name, set)| *set && !allowed.contains(name))
        {
            Some((name, _)) => Err(GridError::invalid_predicate(
                self.operator,
                format!("unexpected '{}'", name),
            )),
            None => Ok(()),
        }
    }
}

impl TryFrom<PredicateSpec> for FilterPredicate {
    type Error = GridError;

    fn try_from(spec: PredicateSpec) -> Result<Self> {
        let op = spec.operator;
        match op {
            FilterOperator::Equals => {
                spec.reject_extra(&["value"])?;
                let value = PredicateSpec::require(op, "value", spec.value)?;
                let value: FieldValue = serde_json::from_value(value).map_err(|e| {
                    GridError::invalid_predicate(op, format!("unsupported value: {}", e))
                })?;
                FilterPredicate::equals(value)
            }
            FilterOperator::Contains => {
                spec.reject_extra(&["value"])?;
                match PredicateSpec::require(op, "value", spec.value)? {
                    Value::String(pattern) => Ok(FilterPredicate::contains(pattern)),
                    other => Err(GridError::invalid_predicate(
                        op,
                        format!("value must be text, got {}", json_kind(&other)),
                    )),
                }
            }
            FilterOperator::InRange => {
                spec.reject_extra(&["min", "max"])?;
                FilterPredicate::in_range(
                    PredicateSpec::require(op, "min", spec.min)?,
                    PredicateSpec::require(op, "max", spec.max)?,
                )
            }
            FilterOperator::OneOf => {
                spec.reject_extra(&["values"])?;
                FilterPredicate::one_of(PredicateSpec::require(op, "values", spec.values)?)
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<FilterPredicate> for PredicateSpec {
    fn from(predicate: FilterPredicate) -> Self {
        let operator = predicate.operator();
        let mut spec = PredicateSpec {
            operator,
            value: None,
            values: None,
            min: None,
            max: None,
        };
        match predicate.inner {
            Predicate::Equals(value) => spec.value = serde_json::to_value(value).ok(),
            Predicate::Contains { pattern, .. } => spec.value = Some(Value::String(pattern)),
            Predicate::InRange { min, max } => {
                spec.min = Some(min);
                spec.max = Some(max);
            }
            Predicate::OneOf(values) => spec.values = Some(values),
        }
        spec
    }
}

/// Active predicates keyed by field; a field with no entry is unconstrained
///
/// Equality ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    predicates: IndexMap<String, FilterPredicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the predicate for a field, returning the one it replaces
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        predicate: FilterPredicate,
    ) -> Option<FilterPredicate> {
        self.predicates.insert(field.into(), predicate)
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, field: impl Into<String>, predicate: FilterPredicate) -> Self {
        self.insert(field, predicate);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<FilterPredicate> {
        self.predicates.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FilterPredicate> {
        self.predicates.get(field)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterPredicate)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A row matches when it satisfies every predicate
    pub fn matches(&self, row: &Row) -> bool {
        self.predicates
            .iter()
            .all(|(field, predicate)| predicate.matches(row.get(field)))
    }

    /// Parse `{"field": <predicate>, ...}`
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| GridError::invalid_query("filter must be a JSON object"))?;

        let mut filters = FilterSet::new();
        for (field, raw) in obj {
            filters.insert(field.clone(), FilterPredicate::from_json(raw)?);
        }
        Ok(filters)
    }
}

/// Rows satisfying every predicate, borrowed, in dataset order
pub(crate) fn matching_rows<'a>(rows: &'a [Row], filters: &FilterSet) -> Vec<&'a Row> {
    if filters.is_empty() {
        return rows.iter().collect();
    }
    rows.iter().filter(|row| filters.matches(row)).collect()
}

/// Reduce `rows` to those matching every predicate in `filters`
///
/// Returns a new sequence in dataset order; the input is left untouched. An
/// empty filter set is the identity.
pub fn apply_filters(rows: &[Row], filters: &FilterSet) -> Vec<Row> {
    matching_rows(rows, filters).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(technology: &str, market_size: i64, risk: &str) -> Row {
        Row::new()
            .with("technology", technology)
            .with("marketSize", market_size)
            .with("riskLevel", risk)
    }

    fn sample() -> Vec<Row> {
        vec![
            row("AI Diagnostics", 42, "Low"),
            row("Surgical Robotics", 18, "High"),
            row("Robotic Surgery", 27, "Medium"),
            row("Telemedicine", 9, "Low"),
        ]
    }

    // === constructors ===

    #[test]
    fn test_equals_rejects_null() {
        let err = FilterPredicate::equals(FieldValue::Null).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PREDICATE");
    }

    #[test]
    fn test_in_range_rejects_non_numeric_bounds() {
        let err = FilterPredicate::in_range("low", 20).unwrap_err();
        match err {
            GridError::InvalidPredicate { operator, message } => {
                assert_eq!(operator, FilterOperator::InRange);
                assert!(message.contains("min"));
            }
            other => panic!("Expected InvalidPredicate, got {:?}", other),
        }
    }

    #[test]
    fn test_in_range_rejects_inverted_bounds() {
        assert!(FilterPredicate::in_range(20, 10).is_err());
        assert!(FilterPredicate::in_range(10, 10).is_ok());
    }

    #[test]
    fn test_one_of_rejects_empty() {
        assert!(FilterPredicate::one_of(Vec::<FieldValue>::new()).is_err());
    }

    // === evaluation ===

    #[test]
    fn test_equals_is_type_aware() {
        let predicate = FilterPredicate::equals(9).unwrap();
        assert!(predicate.matches(Some(&FieldValue::Integer(9))));
        assert!(predicate.matches(Some(&FieldValue::Float(9.0))));
        assert!(!predicate.matches(Some(&FieldValue::from("9"))));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let predicate = FilterPredicate::contains("ROBOT");
        assert!(predicate.matches(Some(&FieldValue::from("Surgical Robotics"))));
        assert!(!predicate.matches(Some(&FieldValue::from("Telemedicine"))));
    }

    #[test]
    fn test_contains_fails_on_non_text() {
        let predicate = FilterPredicate::contains("4");
        assert!(!predicate.matches(Some(&FieldValue::Integer(42))));
    }

    #[test]
    fn test_in_range_is_inclusive_and_numeric_only() {
        let predicate = FilterPredicate::in_range(10, 20).unwrap();
        assert!(predicate.matches(Some(&FieldValue::Integer(10))));
        assert!(predicate.matches(Some(&FieldValue::Float(20.0))));
        assert!(!predicate.matches(Some(&FieldValue::Integer(21))));
        assert!(!predicate.matches(Some(&FieldValue::from("15"))));
    }

    #[test]
    fn test_absent_field_does_not_match() {
        let predicate = FilterPredicate::contains("a");
        assert!(!predicate.matches(None));
    }

    #[test]
    fn test_apply_filters_is_and_across_fields() {
        let rows = sample();
        let filters = FilterSet::new()
            .with("technology", FilterPredicate::contains("robot"))
            .with("riskLevel", FilterPredicate::one_of(["High"]).unwrap());

        let result = apply_filters(&rows, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("marketSize"), Some(&FieldValue::Integer(18)));
    }

    #[test]
    fn test_empty_filter_set_is_identity() {
        let rows = sample();
        let result = apply_filters(&rows, &FilterSet::new());
        assert_eq!(result, rows);
    }

    #[test]
    fn test_filter_on_missing_field_excludes_all() {
        let rows = sample();
        let filters = FilterSet::new().with("region", FilterPredicate::contains(""));
        assert!(apply_filters(&rows, &filters).is_empty());
    }

    // === JSON ===

    #[test]
    fn test_filter_set_from_json() {
        let filters = FilterSet::from_json(&json!({
            "marketSize": {"operator": "inRange", "min": 10, "max": 30},
            "riskLevel": {"operator": "oneOf", "values": ["Low", "Medium", "High"]}
        }))
        .unwrap();

        assert_eq!(filters.len(), 2);
        assert_eq!(
            filters.get("marketSize").map(FilterPredicate::operator),
            Some(FilterOperator::InRange)
        );
        assert_eq!(apply_filters(&sample(), &filters).len(), 2);
    }

    #[test]
    fn test_contains_from_json_requires_text() {
        let err = FilterPredicate::from_json(&json!({"operator": "contains", "value": 5}))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PREDICATE");
    }

    #[test]
    fn test_contains_from_json_keeps_timestamp_pattern_as_text() {
        let predicate = FilterPredicate::from_json(
            &json!({"operator": "contains", "value": "2024-03-01T12:00:00Z"}),
        )
        .unwrap();
        assert!(predicate.matches(Some(&FieldValue::from("Filed 2024-03-01T12:00:00Z"))));
    }

    #[test]
    fn test_contains_matches_timestamp_like_text_loaded_from_json() {
        let rows = vec![
            Row::from_json(&json!({"note": "approved 2024-05-02"})).unwrap(),
            Row::from_json(&json!({"note": "2024-03-01T12:00:00Z"})).unwrap(),
            Row::from_json(&json!({"note": 2024})).unwrap(),
        ];
        let filters = FilterSet::new().with("note", FilterPredicate::contains("2024"));
        assert_eq!(apply_filters(&rows, &filters).len(), 2);
    }

    #[test]
    fn test_in_range_compares_large_integers_exactly() {
        let bound = 9_007_199_254_740_993_i64;
        let predicate = FilterPredicate::in_range(bound, i64::MAX).unwrap();

        assert!(predicate.matches(Some(&FieldValue::Integer(bound))));
        assert!(!predicate.matches(Some(&FieldValue::Integer(bound - 1))));
        assert!(predicate.matches(Some(&FieldValue::Integer(i64::MAX))));
    }

    #[test]
    fn test_in_range_from_json_keeps_integer_bounds() {
        let predicate = FilterPredicate::from_json(
            &json!({"operator": "inRange", "min": 9_007_199_254_740_993_i64, "max": 9_007_199_254_740_995_i64}),
        )
        .unwrap();
        assert!(!predicate.matches(Some(&FieldValue::Integer(9_007_199_254_740_992))));
        assert!(predicate.matches(Some(&FieldValue::Integer(9_007_199_254_740_994))));

        let round_trip = serde_json::to_value(&predicate).unwrap();
        assert_eq!(round_trip["min"], json!(9_007_199_254_740_993_i64));
    }

    #[test]
    fn test_predicate_from_json_rejects_extra_keys() {
        let err = FilterPredicate::from_json(
            &json!({"operator": "equals", "value": "Low", "min": 1}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unexpected 'min'"));
    }

    #[test]
    fn test_unknown_operator_is_query_error() {
        let err = FilterPredicate::from_json(&json!({"operator": "startsWith", "value": "A"}))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_QUERY");
    }

    #[test]
    fn test_filter_set_equality_ignores_order() {
        let a = FilterSet::new()
            .with("a", FilterPredicate::contains("x"))
            .with("b", FilterPredicate::contains("y"));
        let b = FilterSet::new()
            .with("b", FilterPredicate::contains("y"))
            .with("a", FilterPredicate::contains("x"));
        assert_eq!(a, b);
    }
}
