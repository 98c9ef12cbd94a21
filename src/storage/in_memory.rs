//! In-memory implementation of DataSource for static and mocked data

use crate::core::row::{Dataset, Row};
use crate::core::source::DataSource;
use anyhow::{Result, anyhow};
use std::sync::{Arc, RwLock};

/// In-memory data source
///
/// Holds the current dataset behind a lock; [`replace`](Self::replace) swaps in
/// a whole new dataset (with a new version) so readers see either the old rows
/// or the new ones, never a mix.
#[derive(Clone)]
pub struct InMemoryDataSource {
    current: Arc<RwLock<Dataset>>,
}

impl InMemoryDataSource {
    /// Create an in-memory source serving `rows`
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Dataset::new(rows))),
        }
    }

    /// Load rows from a JSON array of objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let dataset = Dataset::from_json(&value)?;
        Ok(Self {
            current: Arc::new(RwLock::new(dataset)),
        })
    }

    /// Install a new dataset, returning its version
    pub fn replace(&self, rows: Vec<Row>) -> Result<uuid::Uuid> {
        let dataset = Dataset::new(rows);
        let version = dataset.version();
        let count = dataset.len();

        let mut current = self
            .current
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        *current = dataset;

        tracing::info!(%version, rows = count, "dataset replaced");
        Ok(version)
    }
}

impl Default for InMemoryDataSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DataSource for InMemoryDataSource {
    fn snapshot(&self) -> Result<Dataset> {
        let current = self
            .current
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(current.clone())
    }
}
