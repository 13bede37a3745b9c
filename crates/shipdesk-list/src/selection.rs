//! Bulk-selection state.
//!
//! Selection is keyed by record identifier and is independent of the
//! current page and sort order.

use std::collections::{btree_set, BTreeSet};

use crate::record::RecordId;

/// The set of record identifiers selected for a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent, removes it if present. Returns whether it is
    /// now selected.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Sets the selection to exactly `visible_ids`.
    pub fn select_all_visible<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        self.ids = visible_ids.into_iter().cloned().collect();
    }

    /// Toggles "select all" over the filtered identifiers.
    ///
    /// When every filtered id is already selected the selection is cleared,
    /// which also drops ids that have left the filtered view. Otherwise the
    /// selection becomes exactly the filtered ids.
    pub fn toggle_all(&mut self, filtered_ids: &[RecordId]) {
        if self.all_selected(filtered_ids) {
            self.clear();
        } else {
            self.select_all_visible(filtered_ids);
        }
    }

    /// Returns whether every id in a non-empty list is selected.
    #[must_use]
    pub fn all_selected(&self, ids: &[RecordId]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.ids.contains(id))
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Removes a single id. Returns whether it was selected.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        self.ids.remove(id)
    }

    /// Drops ids for which `present` returns false.
    pub fn retain(&mut self, mut present: impl FnMut(&RecordId) -> bool) {
        self.ids.retain(|id| present(id));
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Returns the number of selected ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the selected ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        self.ids.iter().cloned().collect()
    }

    /// Iterates over the selected ids in sorted order.
    #[must_use]
    pub fn iter(&self) -> btree_set::Iter<'_, RecordId> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a RecordId;
    type IntoIter = btree_set::Iter<'a, RecordId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
