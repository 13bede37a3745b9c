//! # shipdesk-list
//!
//! List view state for the shipdesk admin screens: orders, products,
//! shipping marks, trackings, Buy4me requests and users.
//!
//! Every admin screen lists dynamic JSON records with the same controls.
//! This crate holds that state and the pure functions behind it:
//!
//! - Free-text search over configured fields
//! - Discrete filters (status, boolean, numeric range, null)
//! - Column sorting with text, number and date collation
//! - Client- or server-side pagination with a page-link window
//! - Bulk selection keyed by record id, independent of page and sort
//! - Bulk action reports ("2 of 3 deleted")
//!
//! ## Example
//!
//! ```
//! use shipdesk_list::{FieldKind, ListConfig, ListController, Record};
//!
//! let config = ListConfig::new()
//!     .search_fields(&["name", "phone"])
//!     .sortable("createdAt", FieldKind::Date)
//!     .list_per_page(20);
//!
//! let records = (0..45)
//!     .map(|i| Record::new().with("id", i).with("name", format!("Mark {i}")))
//!     .collect();
//!
//! let mut list = ListController::with_records(config, records);
//! assert_eq!(list.total_pages(), 3);
//! list.go_to_page(3);
//! assert_eq!(list.visible().len(), 5);
//! ```
//!
//! ## `ListConfig` Options
//!
//! - `id_field` - Field holding the record id (falls back to `id`, `_id`)
//! - `list_display` - Columns to show
//! - `search_fields` - Fields the search box looks at
//! - `sortable` - Sortable columns and how they compare
//! - `ordering` - Default sort order (prefix with `-` for descending)
//! - `list_per_page` - Items per page
//! - `pagination` - Client or server pagination
//! - `filter` - Register a discrete filter
//!
//! ## Filters
//!
//! - `BooleanFilter` - Yes/No filter
//! - `ChoicesFilter` - Filter with predefined choices
//! - `RangeFilter` - Filter by numeric range
//! - `NullFilter` - Filter by null/not null
//!
//! Custom filters can be created by implementing the `Filter` trait.

pub mod actions;
pub mod controller;
pub mod error;
pub mod filters;
pub mod options;
pub mod paginator;
pub mod params;
pub mod record;
pub mod selection;
pub mod sort;

// Re-export main types
pub use actions::{Action, BulkFailure, BulkReport, DeleteSelectedAction, UpdateStatusAction};
pub use controller::{ListController, ListView, LoadState, LoadTicket};
pub use error::{ListError, Result};
pub use filters::{
    is_unconstrained, matches_filters, matches_search, BooleanFilter, ChoicesFilter, Filter,
    FilterState, NullFilter, RangeFilter, SearchTerm,
};
pub use options::{ListConfig, PaginationMode};
pub use paginator::{
    clamp_page, page_window, paginate, total_pages, Page, PageInfo, PageLink, PageSlice,
};
pub use params::{encode_pairs, ListQuery, QueryStyle};
pub use record::{Record, RecordId};
pub use selection::SelectionSet;
pub use sort::{
    compare, compare_text, date_key, number_key, sort_records, Collator, FieldKind, SortDirection,
    SortState,
};
