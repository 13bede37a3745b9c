//! List view configuration options.

use std::fmt;
use std::sync::Arc;

use crate::filters::Filter;
use crate::sort::{FieldKind, SortState};

/// Where pagination happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationMode {
    /// The full data set is loaded and paginated locally.
    #[default]
    Client,
    /// The API returns one page at a time with a total count.
    Server,
}

/// Configuration for how a record type is listed.
#[derive(Clone)]
pub struct ListConfig {
    /// Field holding the record identifier (falls back to `id`, `_id`).
    pub id_field: String,
    /// Columns to display.
    pub list_display: Vec<String>,
    /// Fields searched by the free-text box.
    pub search_fields: Vec<String>,
    /// Sortable fields and how they compare.
    pub sortable: Vec<(String, FieldKind)>,
    /// Default ordering.
    pub ordering: Option<SortState>,
    /// Number of items per page.
    pub list_per_page: usize,
    /// Client- or server-side pagination.
    pub pagination: PaginationMode,
    /// Registered discrete filters.
    pub filters: Vec<Arc<dyn Filter>>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            list_display: Vec::new(),
            search_fields: Vec::new(),
            sortable: Vec::new(),
            ordering: None,
            list_per_page: 20,
            pagination: PaginationMode::Client,
            filters: Vec::new(),
        }
    }
}

impl fmt::Debug for ListConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("id_field", &self.id_field)
            .field("list_display", &self.list_display)
            .field("search_fields", &self.search_fields)
            .field("sortable", &self.sortable)
            .field("ordering", &self.ordering)
            .field("list_per_page", &self.list_per_page)
            .field("pagination", &self.pagination)
            .field(
                "filters",
                &self.filters.iter().map(|f| f.field()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ListConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier field.
    #[must_use]
    pub fn id_field(mut self, field: &str) -> Self {
        self.id_field = field.to_string();
        self
    }

    /// Sets the columns to display.
    #[must_use]
    pub fn list_display(mut self, cols: &[&str]) -> Self {
        self.list_display = cols.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Sets the searchable fields.
    #[must_use]
    pub fn search_fields(mut self, cols: &[&str]) -> Self {
        self.search_fields = cols.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Adds a sortable field.
    #[must_use]
    pub fn sortable(mut self, field: &str, kind: FieldKind) -> Self {
        self.sortable.retain(|(f, _)| f != field);
        self.sortable.push((field.to_string(), kind));
        self
    }

    /// Sets the default ordering (prefix with `-` for descending).
    #[must_use]
    pub fn ordering(mut self, ordering: &str) -> Self {
        self.ordering = Some(SortState::from_ordering(ordering));
        self
    }

    /// Sets the number of items per page.
    #[must_use]
    pub const fn list_per_page(mut self, n: usize) -> Self {
        self.list_per_page = n;
        self
    }

    /// Sets the pagination mode.
    #[must_use]
    pub const fn pagination(mut self, mode: PaginationMode) -> Self {
        self.pagination = mode;
        self
    }

    /// Registers a discrete filter.
    #[must_use]
    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Returns how `field` compares, or None if it is not sortable.
    #[must_use]
    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        self.sortable
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, kind)| *kind)
    }

    /// Returns the registered filter for `field`.
    #[must_use]
    pub fn filter_for(&self, field: &str) -> Option<&dyn Filter> {
        self.filters
            .iter()
            .find(|f| f.field() == field)
            .map(|f| &**f)
    }
}
