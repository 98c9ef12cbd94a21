//! Rows and datasets

use crate::core::field::FieldValue;
use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

/// Stable row identity, independent of display position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record of a dataset: a stable id plus named scalar fields
///
/// Field order is preserved so a rendering layer can fall back to it when no
/// column configuration is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub fields: IndexMap<String, FieldValue>,
}

impl Row {
    /// Create an empty row with a fresh id
    pub fn new() -> Self {
        Self::with_id(RowId::new())
    }

    pub fn with_id(id: RowId) -> Self {
        Self {
            id,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field setter
    ///
    /// ```rust,ignore
    /// let row = Row::new()
    ///     .with("technology", "Telemedicine")
    ///     .with("marketSize", 42);
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Get a field value; `None` when the row does not carry the field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Build a row from a JSON object
    ///
    /// An `id` key holding a UUID string becomes the row id (and is not kept as
    /// a field); otherwise a fresh id is assigned and `id` stays a plain field.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| anyhow!("Row must be a JSON object, got: {}", value))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(RowId);

        let mut row = Row::with_id(id.unwrap_or_default());
        for (key, raw) in obj {
            if key == "id" && id.is_some() {
                continue;
            }
            let value: FieldValue = serde_json::from_value(raw.clone())
                .map_err(|e| anyhow!("Field '{}' is not a scalar: {}", key, e))?;
            row.fields.insert(key.clone(), value);
        }

        Ok(row)
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

/// The full, read-only collection of rows a view works on
///
/// Cloning is cheap (the rows are shared). Each dataset carries a version that
/// changes whenever a new dataset is built, so cached views never outlive the
/// data they were computed from.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Arc<[Row]>,
    version: Uuid,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            version: Uuid::new_v4(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn version(&self) -> Uuid {
        self.version
    }

    /// Parse a JSON array of objects into a dataset
    pub fn from_json(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| anyhow!("Dataset must be a JSON array"))?;

        let rows = items.iter().map(Row::from_json).collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rows))
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Dataset {
    type Target = [Row];

    fn deref(&self) -> &[Row] {
        &self.rows
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
