//! Data source trait for supplying datasets to views

use crate::core::row::Dataset;
use anyhow::Result;

/// Supplies the dataset a view renders
///
/// A source may be static, loaded once, or refreshed from elsewhere. Whatever
/// it does, `snapshot` must hand out a whole dataset: a refresh replaces the
/// dataset reference in one step and callers never observe a partial one.
pub trait DataSource: Send + Sync {
    /// The current dataset
    fn snapshot(&self) -> Result<Dataset>;
}

impl DataSource for Dataset {
    fn snapshot(&self) -> Result<Dataset> {
        Ok(self.clone())
    }
}
