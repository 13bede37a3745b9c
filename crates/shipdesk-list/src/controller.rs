//! The list view controller.
//!
//! [`ListController`] owns the state behind one admin list screen: the raw
//! records, search term, sort, filters, page and selection. Every change
//! recomputes the derived order (`filter -> sort -> clamp page`) eagerly, so
//! reads are cheap and always consistent with the inputs.
//!
//! Loading is modelled as `Idle -> Loading -> Ready | Error`. Each load is
//! identified by a [`LoadTicket`]; a result carrying a superseded ticket is
//! discarded, so a slow response can never overwrite a newer one or apply
//! after the view was torn down.

use std::collections::HashSet;

use tracing::debug;

use crate::actions::BulkReport;
use crate::error::{ListError, Result};
use crate::filters::{is_unconstrained, matches_filters, matches_search, FilterState, SearchTerm};
use crate::options::{ListConfig, PaginationMode};
use crate::paginator::{clamp_page, page_window, total_pages, Page, PageInfo, PageLink};
use crate::params::ListQuery;
use crate::record::{Record, RecordId};
use crate::selection::SelectionSet;
use crate::sort::{compare, Collator, SortState};

/// Data-loading state of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Data is loaded.
    Ready,
    /// The last fetch failed; previously rendered data is kept.
    Error {
        /// User-facing message.
        message: String,
    },
}

impl LoadState {
    /// Returns whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the error message, if the last fetch failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Returns the load generation.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// A read-only snapshot of what the list renders.
#[derive(Debug)]
pub struct ListView<'a> {
    /// Records on the current page, in display order.
    pub records: Vec<&'a Record>,
    /// Page metadata.
    pub page: PageInfo,
    /// Page-link bar.
    pub window: Vec<PageLink>,
    /// Number of selected records.
    pub selected: usize,
    /// Whether every filtered record is selected.
    pub all_selected: bool,
    /// Loading state.
    pub state: &'a LoadState,
}

/// State behind one list screen.
#[derive(Debug)]
pub struct ListController {
    config: ListConfig,
    records: Vec<Record>,
    server_total: usize,
    search: SearchTerm,
    sort: Option<SortState>,
    filters: FilterState,
    page: usize,
    page_size: usize,
    selection: SelectionSet,
    state: LoadState,
    loaded: bool,
    generation: u64,
    pending: Option<u64>,
    // indices into `records` after filtering and sorting
    order: Vec<usize>,
}

impl ListController {
    /// Creates an empty controller.
    #[must_use]
    pub fn new(config: ListConfig) -> Self {
        let page_size = config.list_per_page.max(1);
        let sort = config.ordering.clone();
        Self {
            config,
            records: Vec::new(),
            server_total: 0,
            search: SearchTerm::default(),
            sort,
            filters: FilterState::new(),
            page: 1,
            page_size,
            selection: SelectionSet::new(),
            state: LoadState::Idle,
            loaded: false,
            generation: 0,
            pending: None,
            order: Vec::new(),
        }
    }

    /// Creates a controller over an already loaded data set.
    #[must_use]
    pub fn with_records(config: ListConfig, records: Vec<Record>) -> Self {
        let mut controller = Self::new(config);
        controller.set_records(records);
        controller
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Returns the loading state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the raw records in load order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the current search term.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    /// Returns the current sort.
    #[must_use]
    pub const fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Returns the active filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Returns the current page (1-indexed).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    // ----- loading --------------------------------------------------------

    /// Enters `Loading` and returns the ticket the result must carry.
    ///
    /// Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Returns whether `ticket` belongs to the load in flight.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending == Some(ticket.0)
    }

    /// Applies a successful load. Returns false (and changes nothing) if the
    /// ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, page: Page<Record>) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "discarding stale list load");
            return false;
        }
        self.pending = None;
        self.loaded = true;
        self.state = LoadState::Ready;
        self.replace_data(page.items, page.total);
        true
    }

    /// Records a failed load. Data already rendered stays. Returns false if
    /// the ticket is stale.
    pub fn fail_load(&mut self, ticket: LoadTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "discarding stale list failure");
            return false;
        }
        self.pending = None;
        self.state = LoadState::Error {
            message: message.into(),
        };
        true
    }

    /// Leaves the error state by starting a new load.
    ///
    /// Returns None unless the last load failed.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        match self.state {
            LoadState::Error { .. } => Some(self.begin_load()),
            _ => None,
        }
    }

    /// Abandons the load in flight; its result will be discarded.
    pub fn cancel_load(&mut self) {
        if self.pending.take().is_some() && self.state.is_loading() {
            self.state = if self.loaded {
                LoadState::Ready
            } else {
                LoadState::Idle
            };
        }
    }

    /// Replaces the data set with locally supplied records.
    ///
    /// Any load in flight is superseded.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let total = records.len();
        self.pending = None;
        self.loaded = true;
        self.state = LoadState::Ready;
        self.replace_data(records, total);
    }

    fn replace_data(&mut self, records: Vec<Record>, total: usize) {
        self.server_total = total.max(records.len());
        self.records = records;
        if self.config.pagination == PaginationMode::Client {
            let id_field = &self.config.id_field;
            let present: HashSet<RecordId> =
                self.records.iter().filter_map(|r| r.id(id_field)).collect();
            self.selection.retain(|id| present.contains(id));
        }
        self.recompute();
    }

    // ----- view state -----------------------------------------------------

    /// Sets the search term and returns to page 1. Returns whether the term
    /// changed.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = SearchTerm::new(term);
        if term == self.search {
            return false;
        }
        self.search = term;
        self.page = 1;
        self.recompute();
        true
    }

    /// Handles a click on a column header.
    ///
    /// Re-selecting the sorted field toggles direction; another field starts
    /// ascending. Returns to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::FieldNotSortable`] if `field` is not sortable.
    pub fn sort_by(&mut self, field: &str) -> Result<SortState> {
        if self.config.field_kind(field).is_none() {
            return Err(ListError::FieldNotSortable(field.to_string()));
        }
        let next = SortState::select(self.sort.as_ref(), field);
        self.sort = Some(next.clone());
        self.page = 1;
        self.recompute();
        Ok(next)
    }

    /// Sets (or removes) the sort explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::FieldNotSortable`] if the field is not sortable.
    pub fn set_sort(&mut self, sort: Option<SortState>) -> Result<()> {
        if let Some(ref s) = sort {
            if self.config.field_kind(&s.field).is_none() {
                return Err(ListError::FieldNotSortable(s.field.clone()));
            }
        }
        self.sort = sort;
        self.page = 1;
        self.recompute();
        Ok(())
    }

    /// Sets a discrete filter (`""`/`"all"` clears it) and returns to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::UnknownFilterValue`] for a value the field's
    /// registered filter does not accept.
    pub fn set_filter(&mut self, field: &str, value: &str) -> Result<bool> {
        if !is_unconstrained(value) {
            if let Some(filter) = self.config.filter_for(field) {
                if !filter.accepts(value) {
                    return Err(ListError::UnknownFilterValue {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
        let changed = self.filters.set(field, value);
        if changed {
            self.page = 1;
            self.recompute();
        }
        Ok(changed)
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) -> bool {
        if self.filters.is_empty() {
            return false;
        }
        self.filters.clear();
        self.page = 1;
        self.recompute();
        true
    }

    /// Navigates to `page`, clamped into range. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page = clamp_page(page, self.total_pages());
        self.page
    }

    /// Moves to `page`, deferring the clamp until data has arrived.
    ///
    /// Before the first load the page count is unknown, so the page is only
    /// floored at 1 and the next load clamps it. Once loaded this is
    /// [`go_to_page`](Self::go_to_page).
    pub fn request_page(&mut self, page: usize) -> usize {
        if self.loaded {
            return self.go_to_page(page);
        }
        self.page = page.max(1);
        self.page
    }

    /// Advances one page (stays on the last page).
    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page + 1)
    }

    /// Goes back one page (stays on the first page).
    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Changes the page size and re-clamps the current page.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidPageSize`] for a zero page size.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = clamp_page(self.page, self.total_pages());
        Ok(())
    }

    /// Total count of filtered items across all pages.
    #[must_use]
    pub fn total_items(&self) -> usize {
        match self.config.pagination {
            PaginationMode::Client => self.order.len(),
            PaginationMode::Server => self.server_total,
        }
    }

    /// Number of pages, at least 1.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items(), self.page_size)
    }

    /// Current page metadata.
    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        PageInfo::clamped(self.page, self.page_size, self.total_items())
    }

    /// Records on the current page, in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Record> {
        let indices = match self.config.pagination {
            PaginationMode::Client => &self.order[self.page_info().range()],
            PaginationMode::Server => &self.order[..],
        };
        indices.iter().map(|&i| &self.records[i]).collect()
    }

    /// Every filtered record across all pages, in display order.
    #[must_use]
    pub fn filtered(&self) -> impl Iterator<Item = &Record> {
        self.order.iter().map(move |&i| &self.records[i])
    }

    /// Identifiers of every filtered record across all pages.
    #[must_use]
    pub fn filtered_ids(&self) -> Vec<RecordId> {
        self.filtered()
            .filter_map(|r| r.id(&self.config.id_field))
            .collect()
    }

    /// Identifier of a record under this list's id field.
    #[must_use]
    pub fn record_id(&self, record: &Record) -> Option<RecordId> {
        record.id(&self.config.id_field)
    }

    // ----- selection ------------------------------------------------------

    /// Toggles one record. Returns whether it is now selected.
    pub fn toggle_selected(&mut self, id: &RecordId) -> bool {
        self.selection.toggle(id)
    }

    /// Toggles "select all" over the filtered set (not just this page).
    pub fn toggle_select_all(&mut self) {
        let ids = self.filtered_ids();
        self.selection.toggle_all(&ids);
    }

    /// Selects exactly the filtered set.
    pub fn select_all_filtered(&mut self) {
        let ids = self.filtered_ids();
        self.selection.select_all_visible(&ids);
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.is_selected(id)
    }

    /// Returns the selected ids in sorted order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.ids()
    }

    /// Returns whether every filtered record is selected.
    #[must_use]
    pub fn all_filtered_selected(&self) -> bool {
        self.selection.all_selected(&self.filtered_ids())
    }

    /// Applies the outcome of a bulk action.
    ///
    /// Succeeded ids leave the selection; for removing actions they also
    /// leave the data set. Failed ids stay listed and selected.
    pub fn apply_bulk_report(&mut self, report: &BulkReport) {
        for id in &report.succeeded {
            self.selection.remove(id);
        }
        if !report.removes_records || report.succeeded.is_empty() {
            return;
        }

        let removed: HashSet<&RecordId> = report.succeeded.iter().collect();
        let before = self.records.len();
        let id_field = &self.config.id_field;
        self.records
            .retain(|r| r.id(id_field).is_none_or(|id| !removed.contains(&id)));
        let dropped = before - self.records.len();
        self.server_total = self.server_total.saturating_sub(dropped);
        self.recompute();
    }

    // ----- outputs --------------------------------------------------------

    /// Parameters for fetching the current page from the API.
    #[must_use]
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: Some(self.search.as_str().to_string()).filter(|s| !s.is_empty()),
            ordering: self.sort.clone(),
            filters: self.filters.clone(),
        }
    }

    /// Snapshot of what to render.
    #[must_use]
    pub fn view(&self) -> ListView<'_> {
        let page = self.page_info();
        ListView {
            records: self.visible(),
            page,
            window: page_window(page.page, page.total_pages),
            selected: self.selection.count(),
            all_selected: self.all_filtered_selected(),
            state: &self.state,
        }
    }

    fn recompute(&mut self) {
        self.order = self.derive_order();
        self.page = clamp_page(self.page, self.total_pages());
        debug!(
            total = self.records.len(),
            filtered = self.order.len(),
            page = self.page,
            "list recomputed"
        );
    }

    fn derive_order(&self) -> Vec<usize> {
        if self.config.pagination == PaginationMode::Server {
            // the API already searched, filtered and sorted this page
            return (0..self.records.len()).collect();
        }

        let mut order: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                matches_search(r, &self.search, &self.config.search_fields)
                    && matches_filters(r, &self.filters, &self.config.filters)
            })
            .map(|(i, _)| i)
            .collect();

        if let Some(ref sort) = self.sort {
            let kind = self.config.field_kind(&sort.field).unwrap_or_default();
            let mut collator = Collator::default();
            order.sort_by(|&a, &b| {
                compare(
                    &mut collator,
                    &self.records[a],
                    &self.records[b],
                    &sort.field,
                    kind,
                    sort.direction,
                )
            });
        }
        order
    }
}
