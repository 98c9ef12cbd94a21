//! Core module containing the data model and the pure pipeline stages

pub mod error;
pub mod field;
pub mod filter;
pub mod page;
pub mod query;
pub mod row;
pub mod sort;
pub mod source;
pub mod summary;

pub use error::{ConfigError, ErrorResponse, GridError};
pub use field::{FieldKind, FieldValue};
pub use filter::{FilterOperator, FilterPredicate, FilterSet, apply_filters};
pub use page::{PageSpec, PaginationMeta, ViewResult, apply_pagination, page_window};
pub use query::ViewQuery;
pub use row::{Dataset, Row, RowId};
pub use sort::{SortCriterion, SortDirection, apply_sort};
pub use source::DataSource;
pub use summary::{ColumnSummary, summarize};
