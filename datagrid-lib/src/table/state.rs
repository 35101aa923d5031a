//! Table state owned by one table instance.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

use super::ColumnFilter;
use super::OrderBy;
use super::Selection;

/// Per-column visibility. Columns absent from the map are visible.
///
/// Serializes as a plain JSON object, `{"column_id": bool}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnVisibility(BTreeMap<String, bool>);

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a column is visible (default `true`).
    pub fn is_visible(&self, column: &str) -> bool {
        self.0.get(column).copied().unwrap_or(true)
    }

    pub fn set(&mut self, column: impl Into<String>, visible: bool) {
        self.0.insert(column.into(), visible);
    }

    /// Drops every explicit entry, making all columns visible.
    pub fn show_all(&mut self) {
        self.0.clear();
    }

    /// Keeps only entries whose column id passes `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|id, _| keep(id));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(id, visible)| (id.as_str(), *visible))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for ColumnVisibility {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, visible)| (id.into(), visible)).collect())
    }
}

/// Pagination cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Creates a cursor at the first page. `page_size` must be positive.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    /// Number of pages for `total` rows; zero rows still count as one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Pulls the page index back inside `[0, page_count - 1]`.
    /// Returns `true` if it moved.
    pub fn clamp(&mut self, total: usize) -> bool {
        let last = self.page_count(total) - 1;
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    /// Index range of the current page within `total` rows.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

/// Sorting, filtering, visibility, selection and pagination state.
///
/// Only the table mutates it; renderers read it through
/// [`Table::state`](super::Table::state).
#[derive(Debug, Clone)]
pub struct TableState {
    pub(crate) sort: OrderBy,
    pub(crate) column_filters: BTreeMap<String, ColumnFilter>,
    pub(crate) global_filter: String,
    pub(crate) column_visibility: ColumnVisibility,
    pub(crate) row_selection: Selection,
    pub(crate) pagination: Pagination,
    pub(crate) column_order: Vec<String>,
}

impl TableState {
    pub(crate) fn new(page_size: usize, column_order: Vec<String>) -> Self {
        Self {
            sort: OrderBy::none(),
            column_filters: BTreeMap::new(),
            global_filter: String::new(),
            column_visibility: ColumnVisibility::new(),
            row_selection: Selection::new(),
            pagination: Pagination::new(page_size),
            column_order,
        }
    }

    /// Resets everything tied to a row set. Visibility and column order stay.
    pub(crate) fn reset_for_new_rows(&mut self, page_size: usize) {
        self.sort = OrderBy::none();
        self.column_filters.clear();
        self.global_filter.clear();
        self.row_selection.clear();
        self.pagination = Pagination::new(page_size);
    }

    pub fn sort(&self) -> &OrderBy {
        &self.sort
    }

    pub fn column_filters(&self) -> &BTreeMap<String, ColumnFilter> {
        &self.column_filters
    }

    /// Filter on one column, if any.
    pub fn column_filter(&self, column: &str) -> Option<&ColumnFilter> {
        self.column_filters.get(column)
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn column_visibility(&self) -> &ColumnVisibility {
        &self.column_visibility
    }

    pub fn row_selection(&self) -> &Selection {
        &self.row_selection
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Left-to-right column ids.
    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }
}

/// Per-table UI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub show_column_picker: bool,
    pub show_filters: bool,
}

impl UiState {
    pub fn toggle_column_picker(&mut self) {
        self.show_column_picker = !self.show_column_picker;
    }

    pub fn toggle_filters(&mut self) {
        self.show_filters = !self.show_filters;
    }
}
