//! Tabular data view: the filter → sort → paginate pipeline
//!
//! [`compute_view`] is a pure function of its arguments. Every piece of
//! interactive state (active predicates, sorted column, current page) lives in
//! a caller-owned [`ViewState`] that is replaced wholesale on each user action,
//! so identical inputs always render identical pages and results can be
//! memoized safely (see [`ViewCache`]).

pub mod cache;
pub mod grid;

pub use cache::ViewCache;
pub use grid::GridView;

use crate::core::error::Result;
use crate::core::filter::{FilterPredicate, FilterSet, matching_rows};
use crate::core::page::{PageSpec, ViewResult, paginate_rows};
use crate::core::row::Row;
use crate::core::sort::{SortCriterion, SortDirection, sort_rows};
use serde::{Deserialize, Serialize};

/// Run the pipeline over `rows`
///
/// Filtering runs first so the matched and page counts describe the filtered
/// set; sorting runs on the survivors only; pagination clamps the page index
/// into range before slicing. Criteria are validated before any row is
/// scanned. Only rows on the visible page are cloned.
pub fn compute_view(
    rows: &[Row],
    filters: &FilterSet,
    sort: Option<&SortCriterion>,
    page: PageSpec,
) -> Result<ViewResult> {
    page.validate()?;

    let mut matched = matching_rows(rows, filters);
    sort_rows(&mut matched, sort)?;
    let result = paginate_rows(&matched, page)?;

    tracing::debug!(
        rows = rows.len(),
        predicates = filters.len(),
        sort = ?sort,
        matched = result.total_matched_count,
        pages = result.total_page_count,
        page_index = result.page_index,
        "computed view"
    );

    Ok(result)
}

/// Caller-owned interactive state of one view
///
/// Each intent method returns a new state; nothing is mutated in place. The
/// requested page index is kept as-is across filter and sort changes and is
/// clamped when the view is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub sort: Option<SortCriterion>,
    pub page: PageSpec,
}

impl ViewState {
    /// Unfiltered, unsorted, first page
    pub fn new(page_size: usize) -> Result<Self> {
        Ok(Self {
            filters: FilterSet::new(),
            sort: None,
            page: PageSpec::first(page_size)?,
        })
    }

    pub fn compute(&self, rows: &[Row]) -> Result<ViewResult> {
        compute_view(rows, &self.filters, self.sort.as_ref(), self.page)
    }

    /// Column header click
    pub fn toggle_sort(&self, field: &str) -> Self {
        Self {
            sort: Some(SortCriterion::toggle(self.sort.as_ref(), field)),
            ..self.clone()
        }
    }

    pub fn sort_by(&self, field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort: Some(SortCriterion::new(field, direction)),
            ..self.clone()
        }
    }

    pub fn unsorted(&self) -> Self {
        Self {
            sort: None,
            ..self.clone()
        }
    }

    pub fn with_filter(&self, field: impl Into<String>, predicate: FilterPredicate) -> Self {
        Self {
            filters: self.filters.clone().with(field, predicate),
            ..self.clone()
        }
    }

    pub fn without_filter(&self, field: &str) -> Self {
        let mut filters = self.filters.clone();
        filters.remove(field);
        Self {
            filters,
            ..self.clone()
        }
    }

    pub fn cleared_filters(&self) -> Self {
        Self {
            filters: FilterSet::new(),
            ..self.clone()
        }
    }

    pub fn goto_page(&self, page_index: usize) -> Self {
        Self {
            page: self.page.with_index(page_index),
            ..self.clone()
        }
    }

    /// Step forward from the page that was actually shown
    pub fn next_page(&self, shown: &ViewResult) -> Self {
        let last = shown.total_page_count.saturating_sub(1);
        self.goto_page((shown.page_index + 1).min(last))
    }

    /// Step back from the page that was actually shown
    pub fn previous_page(&self, shown: &ViewResult) -> Self {
        self.goto_page(shown.page_index.saturating_sub(1))
    }

    /// Change the page size, returning to the first page
    pub fn with_page_size(&self, page_size: usize) -> Result<Self> {
        Ok(Self {
            page: PageSpec::first(page_size)?,
            ..self.clone()
        })
    }
}
