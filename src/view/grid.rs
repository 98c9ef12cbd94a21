//! Grid facade: a configured view with memoized rendering
//!
//! Widgets that need tabular semantics (data grids, leaderboards, heatmap
//! legends) hold a [`GridView`] and a [`ViewState`]; every user action swaps
//! the state and calls [`GridView::render`] again.

use crate::config::GridConfig;
use crate::core::error::Result;
use crate::core::filter::matching_rows;
use crate::core::page::{PaginationMeta, ViewResult, page_window};
use crate::core::row::Dataset;
use crate::core::summary::{ColumnSummary, summarize};
use crate::view::{ViewCache, ViewState};
use std::ops::Range;
use std::sync::Arc;

#[derive(Debug)]
pub struct GridView {
    config: Arc<GridConfig>,
    cache: ViewCache,
}

impl GridView {
    pub fn new(config: Arc<GridConfig>) -> Self {
        Self {
            config,
            cache: ViewCache::new(),
        }
    }

    pub fn with_cache(config: Arc<GridConfig>, cache: ViewCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The state a freshly opened grid starts from
    pub fn initial_state(&self) -> Result<ViewState> {
        self.config.initial_state()
    }

    /// Render the page described by `state`
    ///
    /// Sorting on a column the grid does not declare sortable fails with
    /// `UnsortableField` before any row is touched.
    pub fn render(&self, dataset: &Dataset, state: &ViewState) -> Result<ViewResult> {
        if let Some(sort) = &state.sort {
            self.config.ensure_sortable(&sort.field)?;
        }
        self.cache.get_or_compute(dataset, state)
    }

    /// Page metadata plus the page buttons to show for a rendered result
    pub fn controls(&self, result: &ViewResult) -> (PaginationMeta, Range<usize>) {
        let window = page_window(
            result.page_index,
            result.total_page_count,
            self.config.page_window,
        );
        (result.meta(), window)
    }

    /// Summarize a numeric column over the rows matching the state's filters
    pub fn summary(&self, dataset: &Dataset, state: &ViewState, field: &str) -> Option<ColumnSummary> {
        summarize(matching_rows(dataset, &state.filters), field)
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
