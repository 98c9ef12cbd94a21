//! Typed error handling for grid views
//!
//! Every error here is raised against caller-supplied criteria (predicates,
//! sort columns, page sizes, configuration), never against the contents of a
//! dataset: a row whose field does not match simply fails to match.
//!
//! # Error Categories
//!
//! - [`GridError::InvalidPredicate`]: a filter predicate whose operator and value shape disagree
//! - [`GridError::UnsortableField`]: a sort on a column that cannot be ordered
//! - [`GridError::InvalidPageSize`]: a page size that is not a positive integer
//! - [`GridError::InvalidQuery`]: a malformed query string (filter JSON, sort expression)
//! - [`GridError::Config`]: an invalid [`GridConfig`](crate::config::GridConfig)
//!
//! # Example
//!
//! ```rust,ignore
//! match view.render(&dataset, &state) {
//!     Ok(result) => draw(result),
//!     Err(GridError::UnsortableField { field, .. }) => {
//!         // keep the previously rendered page, flag the header
//!     }
//!     Err(e) => eprintln!("{}", e.to_response().message),
//! }
//! ```

use crate::core::filter::FilterOperator;
use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T, E = GridError> = std::result::Result<T, E>;

/// The main error type for grid views
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Operator/value shape mismatch, detected when the predicate is built
    #[error("Invalid {operator} predicate: {message}")]
    InvalidPredicate {
        operator: FilterOperator,
        message: String,
    },

    /// The column cannot be ordered (mixed value types, or not sortable)
    #[error("Field '{field}' cannot be sorted: {reason}")]
    UnsortableField { field: String, reason: String },

    /// Page size must be a positive integer
    #[error("Invalid page size {page_size}: must be a positive integer")]
    InvalidPageSize { page_size: i64 },

    /// Query string could not be parsed
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for the rendering layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl GridError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GridError::InvalidPredicate { .. } => "INVALID_PREDICATE",
            GridError::UnsortableField { .. } => "UNSORTABLE_FIELD",
            GridError::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
            GridError::InvalidQuery { .. } => "INVALID_QUERY",
            GridError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            GridError::InvalidPredicate { operator, .. } => {
                Some(serde_json::json!({ "operator": operator }))
            }
            GridError::UnsortableField { field, .. } => Some(serde_json::json!({ "field": field })),
            GridError::InvalidPageSize { page_size } => {
                Some(serde_json::json!({ "page_size": page_size }))
            }
            GridError::Config(ConfigError::UnknownColumn { column })
            | GridError::Config(ConfigError::DuplicateColumn { column }) => {
                Some(serde_json::json!({ "column": column }))
            }
            _ => None,
        }
    }

    pub(crate) fn invalid_predicate(operator: FilterOperator, message: impl Into<String>) -> Self {
        GridError::InvalidPredicate {
            operator,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        GridError::InvalidQuery {
            message: message.into(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to grid configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Missing required field in configuration
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Two columns share a key
    #[error("Duplicate column '{column}'")]
    DuplicateColumn { column: String },

    /// A reference to a column the grid does not define
    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },
}
