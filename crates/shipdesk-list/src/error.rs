//! Error types for list view state.

use thiserror::Error;

/// List-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// Field is not known to the list configuration.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Field exists but is not in the sortable allow-list.
    #[error("field is not sortable: {0}")]
    FieldNotSortable(String),

    /// Requested page lies outside `[1, total_pages]`.
    #[error("page {page} out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// Page size must be greater than zero.
    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Value is not one of the filter's choices.
    #[error("unknown value {value:?} for filter {field}")]
    UnknownFilterValue { field: String, value: String },
}

/// Result type alias for list operations.
pub type Result<T> = std::result::Result<T, ListError>;
