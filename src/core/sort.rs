//! Sort engine: single-key stable ordering

use crate::core::error::{GridError, Result};
use crate::core::field::{FieldKind, FieldValue};
use crate::core::row::Row;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Which column to order by, and in which direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCriterion {
    pub field: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// The criterion after the user clicks the header of `field`
    ///
    /// Clicking the active column while it is ascending flips it to
    /// descending; every other click sorts the clicked column ascending.
    pub fn toggle(current: Option<&SortCriterion>, field: &str) -> SortCriterion {
        match current {
            Some(c) if c.field == field && c.direction == SortDirection::Ascending => {
                SortCriterion::descending(field)
            }
            _ => SortCriterion::ascending(field),
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}:{}", self.field, dir)
    }
}

/// Parse `field`, `field:asc` or `field:desc`
///
/// Only a trailing `:asc` or `:desc` is read as a direction; any other colon
/// belongs to the field name.
impl FromStr for SortCriterion {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.rsplit_once(':') {
            Some((field, "asc")) => (field, SortDirection::Ascending),
            Some((field, "desc")) => (field, SortDirection::Descending),
            _ => (s, SortDirection::Ascending),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(GridError::invalid_query("sort field must not be empty"));
        }
        Ok(SortCriterion::new(field, direction))
    }
}

/// The single kind shared by every present, non-null value of `field`
///
/// `Ok(None)` when no row carries a value for the field.
fn column_kind<'a, I>(rows: I, field: &str) -> Result<Option<FieldKind>>
where
    I: IntoIterator<Item = &'a Row>,
{
    let kinds: BTreeSet<FieldKind> = rows
        .into_iter()
        .filter_map(|row| row.get(field))
        .map(FieldValue::kind)
        .filter(|kind| *kind != FieldKind::Null)
        .collect();

    match kinds.len() {
        0 => Ok(None),
        1 => Ok(kinds.into_iter().next()),
        _ => {
            let found: Vec<String> = kinds.iter().map(ToString::to_string).collect();
            tracing::warn!(field = %field, kinds = ?found, "refusing to sort mixed-type column");
            Err(GridError::UnsortableField {
                field: field.to_string(),
                reason: format!("mixed value types ({})", found.join(", ")),
            })
        }
    }
}

fn sort_key<'a>(row: &'a Row, field: &str) -> Option<&'a FieldValue> {
    row.get(field).filter(|v| !v.is_null())
}

/// Order two rows by `criterion`
///
/// Rows lacking a value (absent or null) go last in either direction; the
/// direction only reverses the comparison between present values.
fn compare_rows(a: &Row, b: &Row, criterion: &SortCriterion) -> Ordering {
    match (sort_key(a, &criterion.field), sort_key(b, &criterion.field)) {
        (Some(x), Some(y)) => {
            let ord = x.compare_same_kind(y).unwrap_or(Ordering::Equal);
            match criterion.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort of borrowed rows
pub(crate) fn sort_rows(rows: &mut [&Row], criterion: Option<&SortCriterion>) -> Result<()> {
    let Some(criterion) = criterion else {
        return Ok(());
    };

    column_kind(rows.iter().copied(), &criterion.field)?;
    rows.sort_by(|a, b| compare_rows(a, b, criterion));
    Ok(())
}

/// Order `rows` by `criterion`, or return them unchanged when it is absent
///
/// The sort is stable: rows with equal keys keep their relative input order in
/// both directions. Fails with [`GridError::UnsortableField`] when the field
/// holds values of more than one kind.
pub fn apply_sort(rows: &[Row], criterion: Option<&SortCriterion>) -> Result<Vec<Row>> {
    let mut refs: Vec<&Row> = rows.iter().collect();
    sort_rows(&mut refs, criterion)?;
    Ok(refs.into_iter().cloned().collect())
}
