//! Row selection state.
//!
//! Selection is keyed by [`RowId`] so it stays attached to the same rows when
//! the table is re-sorted or re-filtered.

use std::collections::HashSet;

use crate::model::RowId;

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<RowId>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<RowId> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<RowId> {
        self.selected.drain().collect()
    }

    /// Toggle selection of an ID.
    /// Returns `true` if the ID is selected afterwards.
    pub fn toggle(&mut self, id: &RowId) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// Select every ID in `ids`.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a RowId>) {
        self.selected.extend(ids.into_iter().cloned());
    }

    /// Deselect every ID in `ids`.
    pub fn deselect_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a RowId>) {
        for id in ids {
            self.selected.remove(id);
        }
    }

    /// Keep only IDs for which `keep` returns `true`.
    /// Returns the number of IDs dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&RowId) -> bool) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| keep(id));
        before - self.selected.len()
    }
}
