//! Grid configuration loading and management

use crate::core::error::{ConfigError, GridError, Result as GridResult};
use crate::core::sort::SortCriterion;
use crate::view::ViewState;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    10
}

fn default_page_window() -> usize {
    5
}

/// Configuration for one grid column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Row field the column displays (e.g., "marketSize")
    pub key: String,

    /// Header label (e.g., "Market Size")
    pub label: String,

    /// Whether clicking the header sorts by this column
    #[serde(default = "default_true")]
    pub sortable: bool,
}

impl ColumnConfig {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
        }
    }

    pub fn unsortable(key: &str, label: &str) -> Self {
        Self {
            sortable: false,
            ..Self::new(key, label)
        }
    }
}

/// Complete configuration for a grid view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Columns in display order
    pub columns: Vec<ColumnConfig>,

    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum number of page buttons shown at once
    #[serde(default = "default_page_window")]
    pub page_window: usize,

    /// Sort applied when the grid first opens
    #[serde(default)]
    pub default_sort: Option<SortCriterion>,
}

impl GridConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid config '{}'", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid grid config '{}'", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::MissingField {
                field: "columns".to_string(),
                context: "grid config".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "columns.key".to_string(),
                    value: column.key.clone(),
                    message: "column key must not be empty".to_string(),
                });
            }
            if !seen.insert(column.key.as_str()) {
                return Err(ConfigError::DuplicateColumn {
                    column: column.key.clone(),
                });
            }
        }

        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size".to_string(),
                value: self.page_size.to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.page_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_window".to_string(),
                value: self.page_window.to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if let Some(sort) = &self.default_sort {
            match self.column(&sort.field) {
                None => {
                    return Err(ConfigError::UnknownColumn {
                        column: sort.field.clone(),
                    });
                }
                Some(column) if !column.sortable => {
                    return Err(ConfigError::InvalidValue {
                        field: "default_sort".to_string(),
                        value: sort.to_string(),
                        message: "column is not sortable".to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Find a column by key
    pub fn column(&self, key: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Sorting is only allowed on declared, sortable columns
    pub fn ensure_sortable(&self, field: &str) -> GridResult<()> {
        match self.column(field) {
            Some(column) if column.sortable => Ok(()),
            Some(_) => Err(GridError::UnsortableField {
                field: field.to_string(),
                reason: "column is not sortable".to_string(),
            }),
            None => Err(GridError::UnsortableField {
                field: field.to_string(),
                reason: "no such column".to_string(),
            }),
        }
    }

    /// Unfiltered first page with the default sort
    pub fn initial_state(&self) -> GridResult<ViewState> {
        let mut state = ViewState::new(self.page_size)?;
        state.sort = self.default_sort.clone();
        Ok(state)
    }

    /// The healthcare-technology market data grid
    pub fn market_data_default() -> Self {
        Self {
            columns: vec![
                ColumnConfig::new("technology", "Technology"),
                ColumnConfig::new("marketSize", "Market Size"),
                ColumnConfig::new("penetrationRate", "Penetration"),
                ColumnConfig::new("investmentVolume", "Investment"),
                ColumnConfig::new("growthRate", "Growth"),
                ColumnConfig::new("companies", "Companies"),
                ColumnConfig::new("regulatoryStatus", "Regulatory"),
                ColumnConfig::new("competitiveIndex", "Competition"),
                ColumnConfig::new("riskLevel", "Risk"),
                ColumnConfig::unsortable("sparkline", "Trend"),
            ],
            page_size: default_page_size(),
            page_window: default_page_window(),
            default_sort: Some(SortCriterion::descending("marketSize")),
        }
    }
}
