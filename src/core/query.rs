//! Query parameters for driving a view from a URL or message

use crate::core::error::{GridError, Result};
use crate::core::filter::FilterSet;
use crate::core::page::PageSpec;
use crate::core::sort::SortCriterion;
use crate::view::ViewState;
use serde::Deserialize;
use serde_json::Value;

/// Query parameters for pagination, filtering and sorting
///
/// All parameters have sensible defaults.
///
/// # Example
/// ```text
/// ?page=2&limit=10
/// ?filter={"riskLevel": {"operator": "equals", "value": "Low"}}
/// ?page=1&limit=20&filter={"marketSize": {"operator": "inRange", "min": 10, "max": 20}}&sort=marketSize:desc
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of rows per page; must be positive
    pub limit: i64,

    /// Filters as a JSON object of field → predicate
    pub filter: Option<String>,

    /// Sort field and direction
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    pub sort: Option<String>,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            filter: None,
            sort: None,
        }
    }
}

impl ViewQuery {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Parse the filter JSON string into a filter set
    pub fn filters(&self) -> Result<FilterSet> {
        let Some(raw) = self.filter.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(FilterSet::new());
        };
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| GridError::invalid_query(format!("filter is not valid JSON: {}", e)))?;
        FilterSet::from_json(&value)
    }

    pub fn sort_criterion(&self) -> Result<Option<SortCriterion>> {
        self.sort
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .transpose()
    }

    pub fn page_spec(&self) -> Result<PageSpec> {
        let page_size = usize::try_from(self.limit)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(GridError::InvalidPageSize {
                page_size: self.limit,
            })?;
        PageSpec::new(page_size, self.page() - 1)
    }

    /// Validate every parameter and build the corresponding view state
    pub fn into_state(self) -> Result<ViewState> {
        Ok(ViewState {
            filters: self.filters()?,
            sort: self.sort_criterion()?,
            page: self.page_spec()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterOperator;

    #[test]
    fn test_query_defaults() {
        let query = ViewQuery::default();
        let state = query.into_state().unwrap();

        assert!(state.filters.is_empty());
        assert!(state.sort.is_none());
        assert_eq!(state.page, PageSpec::new(10, 0).unwrap());
    }

    #[test]
    fn test_query_deserialize_partial() {
        let query: ViewQuery = serde_json::from_str(r#"{"page": 3, "sort": "growthRate:desc"}"#)
            .unwrap();
        let state = query.into_state().unwrap();

        assert_eq!(state.page.page_index, 2);
        assert_eq!(state.sort, Some(SortCriterion::descending("growthRate")));
    }

    #[test]
    fn test_page_zero_means_first() {
        let query = ViewQuery {
            page: 0,
            ..ViewQuery::default()
        };
        assert_eq!(query.page_spec().unwrap().page_index, 0);
    }

    #[test]
    fn test_non_positive_limit() {
        for limit in [0, -5] {
            let query = ViewQuery {
                limit,
                ..ViewQuery::default()
            };
            assert_eq!(
                query.page_spec().unwrap_err(),
                GridError::InvalidPageSize { page_size: limit }
            );
        }
    }

    #[test]
    fn test_filter_json() {
        let query = ViewQuery {
            filter: Some(r#"{"technology": {"operator": "contains", "value": "AI"}}"#.to_string()),
            ..ViewQuery::default()
        };
        let filters = query.filters().unwrap();
        assert_eq!(
            filters.get("technology").map(|p| p.operator()),
            Some(FilterOperator::Contains)
        );
    }

    #[test]
    fn test_malformed_filter_json() {
        let query = ViewQuery {
            filter: Some("{not json".to_string()),
            ..ViewQuery::default()
        };
        assert_eq!(query.filters().unwrap_err().error_code(), "INVALID_QUERY");
    }

    #[test]
    fn test_invalid_predicate_in_query() {
        let query = ViewQuery {
            filter: Some(r#"{"marketSize": {"operator": "inRange", "min": "a", "max": 3}}"#.to_string()),
            ..ViewQuery::default()
        };
        assert_eq!(query.into_state().unwrap_err().error_code(), "INVALID_PREDICATE");
    }

    #[test]
    fn test_empty_sort_field() {
        let query = ViewQuery {
            sort: Some(":desc".to_string()),
            ..ViewQuery::default()
        };
        assert_eq!(query.into_state().unwrap_err().error_code(), "INVALID_QUERY");
    }

    #[test]
    fn test_unknown_suffix_is_part_of_field() {
        let query = ViewQuery {
            sort: Some("marketSize:up".to_string()),
            ..ViewQuery::default()
        };
        assert_eq!(
            query.into_state().unwrap().sort,
            Some(SortCriterion::ascending("marketSize:up"))
        );
    }
}
