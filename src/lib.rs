//! # Gridview
//!
//! Sortable, filterable, paginated views over in-memory tabular datasets,
//! for dashboards whose grids, leaderboards and heatmaps all need the same
//! table semantics.
//!
//! ## Features
//!
//! - **Pure Pipeline**: filter → sort → paginate, with no hidden state
//! - **Fail-Fast Criteria**: malformed predicates, sorts and page sizes are rejected before any row is scanned
//! - **Type-Aware Filtering**: `equals`, `contains`, `inRange`, `oneOf` without implicit coercion
//! - **Stable Sorting**: ties keep dataset order in both directions
//! - **Clamped Paging**: a page index past the end yields the last page
//! - **Memoization**: results cached per dataset version and criteria
//! - **Configuration-Based**: declare columns and defaults in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gridview::prelude::*;
//!
//! let dataset: Dataset = (1..=25)
//!     .map(|i| Row::new().with("marketSize", i))
//!     .collect();
//!
//! let state = ViewState::new(10)?
//!     .sort_by("marketSize", SortDirection::Descending)
//!     .with_filter("marketSize", FilterPredicate::in_range(10, 20)?);
//!
//! let page = state.compute(&dataset)?;
//! assert_eq!(page.total_matched_count, 11);
//! assert_eq!(page.total_page_count, 2);
//! ```

pub mod config;
pub mod core;
pub mod storage;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Data Model ===
    pub use crate::core::{
        field::{FieldKind, FieldValue},
        row::{Dataset, Row, RowId},
        source::DataSource,
    };

    // === Pipeline Stages ===
    pub use crate::core::{
        filter::{FilterOperator, FilterPredicate, FilterSet, apply_filters},
        page::{PageSpec, PaginationMeta, ViewResult, apply_pagination, page_window},
        sort::{SortCriterion, SortDirection, apply_sort},
        summary::{ColumnSummary, summarize},
    };

    // === Views ===
    pub use crate::core::query::ViewQuery;
    pub use crate::view::{GridView, ViewCache, ViewState, compute_view};

    // === Errors ===
    pub use crate::core::error::{ConfigError, ErrorResponse, GridError};

    // === Storage ===
    pub use crate::storage::InMemoryDataSource;

    // === Config ===
    pub use crate::config::{ColumnConfig, GridConfig};
}
