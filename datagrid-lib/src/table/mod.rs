//! Table engine.
//!
//! A [`Table`] owns the rows, the column model and a [`TableState`], and
//! re-derives the filtered, sorted row order after every state change:
//!
//! 1. column filters, then the global search, narrow the row set;
//! 2. a stable multi-key sort orders it;
//! 3. pagination slices the current page out of it.
//!
//! Rows are never mutated. Export works on step 2's output, so it always
//! covers every matching row whatever page is showing.
//!
//! # Example
//!
//! ```
//! use datagrid_lib::{Column, Table};
//! use datagrid_lib::table::{ColumnFilter, OrderBy};
//!
//! struct User { name: &'static str, bits: i64 }
//!
//! let mut table = Table::builder(vec![
//!     Column::accessor("name", |u: &User| u.name),
//!     Column::accessor("bits", |u: &User| u.bits),
//! ])
//! .rows(vec![
//!     User { name: "ann", bits: 10 },
//!     User { name: "bob", bits: 30 },
//!     User { name: "cy", bits: 20 },
//! ])
//! .build()
//! .unwrap();
//!
//! table.set_column_filter("bits", Some(ColumnFilter::range(Some(15.0), None)));
//! table.set_sort(OrderBy::desc("bits"));
//!
//! let names: Vec<_> = table.visible_rows().iter().map(|u| u.name).collect();
//! assert_eq!(names, vec!["bob", "cy"]);
//! assert_eq!(table.total_filtered_count(), 2);
//! ```

mod facet;
mod filter;
mod options;
mod order;
mod page;
mod selection;
mod state;

pub use filter::ColumnFilter;
pub use filter::TextMatch;
pub use options::PAGE_SIZE_OPTIONS;
pub use options::TableOptions;
pub use order::Direction;
pub use order::OrderBy;
pub use page::Page;
pub use selection::Selection;
pub use state::ColumnVisibility;
pub use state::Pagination;
pub use state::TableState;
pub use state::UiState;

use std::collections::HashSet;
use std::sync::Arc;

use crate::action::BulkAction;
use crate::action::CommandEffect;
use crate::action::TableCommand;
use crate::column::Column;
use crate::column::HeaderContext;
use crate::error::ConfigError;
use crate::error::ExportError;
use crate::export;
use crate::export::ExportFormat;
use crate::export::ExportOptions;
use crate::export::ExportPayload;
use crate::model::RowId;
use crate::model::Value;
use crate::prefs::Preferences;

/// Derives a row's selection key.
pub type RowKeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Observes the selected row ids after every selection change.
pub type SelectionChangeFn = Arc<dyn Fn(&[RowId]) + Send + Sync>;

/// Builder for [`Table`].
pub struct TableBuilder<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    row_key: Option<RowKeyFn<T>>,
    options: TableOptions,
    preferences: Option<Preferences>,
    bulk_actions: Vec<BulkAction<T>>,
    column_order: Option<Vec<String>>,
    on_selection_change: Option<SelectionChangeFn>,
}

impl<T> TableBuilder<T> {
    /// Sets the initial rows.
    pub fn rows(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self
    }

    /// Derives row ids from the rows instead of their index.
    ///
    /// Keys should be unique within a row set.
    pub fn row_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.row_key = Some(Arc::new(f));
        self
    }

    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches a preference store for column visibility.
    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn bulk_action(mut self, action: BulkAction<T>) -> Self {
        self.bulk_actions.push(action);
        self
    }

    /// Registers a callback receiving the selected ids (sorted) whenever the
    /// selection changes.
    pub fn on_selection_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[RowId]) + Send + Sync + 'static,
    {
        self.on_selection_change = Some(Arc::new(f));
        self
    }

    /// Sets the initial left-to-right column order.
    pub fn column_order(mut self, order: Vec<String>) -> Self {
        self.column_order = Some(order);
        self
    }

    /// Validates the configuration and builds the table.
    pub fn build(self) -> Result<Table<T>, ConfigError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.id()) {
                return Err(ConfigError::DuplicateColumn(column.id().to_string()));
            }
        }

        if self.options.page_size == 0 || self.options.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }

        let default_order: Vec<String> = self.columns.iter().map(|c| c.id().to_string()).collect();
        let column_order = match self.column_order {
            Some(order) => complete_order(order, &default_order)?,
            None => default_order,
        };

        let mut state = TableState::new(self.options.page_size, column_order);

        if self.options.persist_preferences
            && let Some(prefs) = &self.preferences
            && let Some(mut visibility) = prefs.load(&self.options.preferences_key)
        {
            visibility.retain(|id| seen.contains(id));
            log::debug!(
                "[table] restored column visibility for '{}'",
                self.options.preferences_key
            );
            state.column_visibility = visibility;
        }

        let mut table = Table {
            columns: self.columns,
            row_ids: Vec::new(),
            rows: self.rows,
            row_key: self.row_key,
            options: self.options,
            state,
            ui: UiState::default(),
            preferences: self.preferences,
            bulk_actions: self.bulk_actions,
            on_selection_change: self.on_selection_change,
            view: Vec::new(),
        };
        table.row_ids = table.assign_ids(&table.rows, 0);
        table.refresh();
        Ok(table)
    }
}

/// Appends ids missing from `order` and rejects unknown ones.
fn complete_order(mut order: Vec<String>, all: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut seen = HashSet::new();
    for id in &order {
        if !all.contains(id) {
            return Err(ConfigError::UnknownColumn(id.clone()));
        }
        if !seen.insert(id.clone()) {
            return Err(ConfigError::DuplicateColumn(id.clone()));
        }
    }
    order.extend(all.iter().filter(|id| !seen.contains(*id)).cloned());
    Ok(order)
}

/// A data grid over rows of type `T`.
pub struct Table<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    row_ids: Vec<RowId>,
    row_key: Option<RowKeyFn<T>>,
    options: TableOptions,
    state: TableState,
    ui: UiState,
    preferences: Option<Preferences>,
    bulk_actions: Vec<BulkAction<T>>,
    on_selection_change: Option<SelectionChangeFn>,
    /// Row indices after filtering and sorting.
    view: Vec<usize>,
}

impl<T> Table<T> {
    /// Starts building a table over the given columns.
    pub fn builder(columns: Vec<Column<T>>) -> TableBuilder<T> {
        TableBuilder {
            columns,
            rows: Vec::new(),
            row_key: None,
            options: TableOptions::default(),
            preferences: None,
            bulk_actions: Vec::new(),
            column_order: None,
            on_selection_change: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    pub fn toggle_column_picker(&mut self) {
        self.ui.toggle_column_picker();
    }

    pub fn toggle_filters(&mut self) {
        self.ui.toggle_filters();
    }

    /// All rows, unfiltered.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        self.state.column_visibility.is_visible(id)
    }

    /// Visible columns, left to right.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.ordered_columns()
            .into_iter()
            .filter(|c| self.is_column_visible(c.id()))
            .collect()
    }

    /// Columns offered by the column picker (hideable ones), left to right.
    pub fn picker_columns(&self) -> Vec<&Column<T>> {
        self.ordered_columns().into_iter().filter(|c| c.can_hide()).collect()
    }

    fn ordered_columns(&self) -> Vec<&Column<T>> {
        self.state
            .column_order
            .iter()
            .filter_map(|id| self.column(id))
            .collect()
    }

    /// Rows matching every filter, in sorted order.
    pub fn filtered_rows(&self) -> Vec<&T> {
        self.view.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Number of rows matching every filter, across all pages.
    pub fn total_filtered_count(&self) -> usize {
        self.view.len()
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> Vec<&T> {
        self.page().rows()
    }

    /// The current page with pagination info.
    pub fn page(&self) -> Page<'_, T> {
        let total = self.view.len();
        let pagination = self.state.pagination;
        let rows = self.view[pagination.range(total)]
            .iter()
            .map(|&i| (&self.row_ids[i], &self.rows[i]))
            .collect();
        Page::new(
            rows,
            pagination.page_index,
            pagination.page_size,
            pagination.page_count(total),
            total,
        )
    }

    /// Renders a header with the current sort and selection context.
    pub fn render_header(&self, column: &Column<T>) -> String {
        let sort = self.state.sort.position(column.id());
        let cx = HeaderContext {
            column_id: column.id(),
            sort: sort.map(|(_, direction)| direction),
            sort_index: sort.map(|(idx, _)| idx),
            all_page_rows_selected: self.is_all_page_rows_selected(),
            some_page_rows_selected: self.is_some_page_rows_selected(),
        };
        column.header_def().render(&cx)
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Replaces the sort. Unknown or unsortable columns are dropped.
    pub fn set_sort(&mut self, sort: OrderBy) {
        let mut cleaned = OrderBy::none();
        for (id, direction) in sort.fields {
            match self.column(&id) {
                Some(column) if column.can_sort() => {
                    if cleaned.position(&id).is_none() {
                        cleaned.fields.push((id, direction));
                    }
                }
                _ => log::warn!("[table] ignoring sort on column '{}'", id),
            }
        }
        self.state.sort = cleaned;
        self.refresh();
    }

    /// Cycles a column's sort none → asc → desc → none, as a header click does.
    ///
    /// With `multi` (shift-click) the column is added to the existing sort
    /// instead of replacing it.
    pub fn toggle_sort(&mut self, column: &str, multi: bool) {
        if !self.column(column).is_some_and(|c| c.can_sort()) {
            log::warn!("[table] ignoring sort toggle on column '{}'", column);
            return;
        }
        let current = self.state.sort.position(column).map(|(_, d)| d);
        let next = Direction::cycle(current);
        self.state.sort.set(column, next, multi);
        self.refresh();
    }

    pub fn clear_sort(&mut self) {
        self.state.sort = OrderBy::none();
        self.refresh();
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Sets or clears (`None` or an empty filter) a column filter.
    pub fn set_column_filter(&mut self, column: &str, filter: Option<ColumnFilter>) {
        if !self.column(column).is_some_and(|c| c.can_filter()) {
            log::warn!("[table] ignoring filter on column '{}'", column);
            return;
        }
        match filter {
            Some(filter) if !filter.is_empty() => {
                self.state.column_filters.insert(column.to_string(), filter);
            }
            _ => {
                self.state.column_filters.remove(column);
            }
        }
        self.refresh();
    }

    pub fn clear_column_filters(&mut self) {
        self.state.column_filters.clear();
        self.refresh();
    }

    /// Sets the case-insensitive search across all filterable columns.
    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        self.state.global_filter = text.into();
        self.refresh();
    }

    // =========================================================================
    // Column visibility and order
    // =========================================================================

    pub fn set_column_visibility(&mut self, column: &str, visible: bool) {
        if self.column(column).is_none() {
            log::warn!("[table] ignoring visibility of unknown column '{}'", column);
            return;
        }
        self.state.column_visibility.set(column, visible);
        self.save_preferences();
    }

    pub fn toggle_column_visibility(&mut self, column: &str) {
        let visible = self.is_column_visible(column);
        self.set_column_visibility(column, !visible);
    }

    pub fn show_all_columns(&mut self) {
        self.state.column_visibility.show_all();
        self.save_preferences();
    }

    /// Shows every column and forgets the saved visibility.
    pub fn reset_column_visibility(&mut self) {
        self.state.column_visibility.show_all();
        if !self.options.persist_preferences {
            return;
        }
        if let Some(prefs) = &self.preferences
            && let Err(e) = prefs.forget(&self.options.preferences_key)
        {
            log::warn!(
                "[table] failed to forget preferences '{}': {}",
                self.options.preferences_key,
                e
            );
        }
    }

    /// Reorders columns. Ids left out keep their relative order at the end.
    pub fn set_column_order(&mut self, order: Vec<String>) -> Result<(), ConfigError> {
        let all: Vec<String> = self.columns.iter().map(|c| c.id().to_string()).collect();
        self.state.column_order = complete_order(order, &all)?;
        Ok(())
    }

    fn save_preferences(&self) {
        if !self.options.persist_preferences {
            return;
        }
        if let Some(prefs) = &self.preferences
            && let Err(e) = prefs.save(&self.options.preferences_key, &self.state.column_visibility)
        {
            log::warn!(
                "[table] failed to save preferences '{}': {}",
                self.options.preferences_key,
                e
            );
        }
    }

    // =========================================================================
    // Row selection
    // =========================================================================

    /// Whether a row is selected. Rows hidden by filters keep their selection.
    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.state.row_selection.is_selected(id)
    }

    /// Flips one row's selection. Only rows in the filtered set can be selected.
    pub fn toggle_row_selection(&mut self, id: &RowId) {
        if !self.options.enable_row_selection {
            return;
        }
        if !self.view.iter().any(|&i| &self.row_ids[i] == id) {
            log::debug!("[table] ignoring selection of row '{}' outside the filtered set", id);
            return;
        }
        self.state.row_selection.toggle(id);
        self.notify_selection();
    }

    /// Selects every row on the current page, or deselects them all when they
    /// already are. Rows on other pages are untouched.
    pub fn toggle_all_on_page(&mut self) {
        if !self.options.enable_row_selection {
            return;
        }
        let ids: Vec<RowId> = self.page().ids().into_iter().cloned().collect();
        if ids.is_empty() {
            return;
        }
        if self.is_all_page_rows_selected() {
            self.state.row_selection.deselect_all(&ids);
        } else {
            self.state.row_selection.select_all(&ids);
        }
        self.notify_selection();
    }

    pub fn clear_selection(&mut self) {
        if !self.state.row_selection.clear().is_empty() {
            self.notify_selection();
        }
    }

    fn notify_selection(&self) {
        if let Some(callback) = &self.on_selection_change {
            callback(&self.state.row_selection.selected());
        }
    }

    pub fn is_all_page_rows_selected(&self) -> bool {
        let page = self.page();
        !page.is_empty() && page.ids().into_iter().all(|id| self.is_row_selected(id))
    }

    pub fn is_some_page_rows_selected(&self) -> bool {
        let page = self.page();
        let selected = page.ids().into_iter().filter(|id| self.is_row_selected(id)).count();
        selected > 0 && selected < page.len()
    }

    /// Selected rows in filtered-sorted order. Selected rows hidden by
    /// filters are left out.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.view
            .iter()
            .filter(|&&i| self.is_row_selected(&self.row_ids[i]))
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Selected row ids, sorted, including rows hidden by filters.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.state.row_selection.selected()
    }

    pub fn bulk_actions(&self) -> &[BulkAction<T>] {
        &self.bulk_actions
    }

    /// Runs a bulk action over the selected rows.
    ///
    /// Returns the number of rows handed to the action, or `None` when the
    /// index is out of range or nothing is selected.
    pub fn run_bulk_action(&self, index: usize) -> Option<usize> {
        let action = self.bulk_actions.get(index)?;
        let rows = self.selected_rows();
        if rows.is_empty() {
            return None;
        }
        log::debug!("[table] running bulk action '{}' on {} rows", action.label(), rows.len());
        action.run(&rows);
        Some(rows.len())
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn page_count(&self) -> usize {
        self.state.pagination.page_count(self.view.len())
    }

    /// Moves to a page, clamped to the last page.
    pub fn set_page(&mut self, page_index: usize) {
        self.state.pagination.page_index = page_index;
        self.state.pagination.clamp(self.view.len());
    }

    /// Sizes a page-size picker offers: the configured options plus the
    /// current size, ascending.
    pub fn page_size_options(&self) -> Vec<usize> {
        let mut sizes = self.options.page_size_options.clone();
        sizes.push(self.state.pagination.page_size);
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    /// Changes the page size, keeping the first row of the current page in view.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let first_row = self.state.pagination.page_index * self.state.pagination.page_size;
        self.state.pagination = Pagination {
            page_index: first_row / page_size,
            page_size,
        };
        self.state.pagination.clamp(self.view.len());
        Ok(())
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.pagination.page_index + 1 < self.page_count()
    }

    pub fn first_page(&mut self) {
        self.set_page(0);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.pagination.page_index.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.pagination.page_index + 1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.page_count() - 1);
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Replaces the row set. Sort, filters, search, selection and pagination
    /// reset; column visibility and order are kept.
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        let had_selection = !self.state.row_selection.is_empty();
        self.row_ids = self.assign_ids(&rows, 0);
        self.rows = rows;
        self.state.reset_for_new_rows(self.options.page_size);
        self.refresh();
        if had_selection {
            self.notify_selection();
        }
    }

    /// Appends rows to the current row set ("load more"). State is kept.
    pub fn extend_rows(&mut self, rows: Vec<T>) {
        let ids = self.assign_ids(&rows, self.rows.len());
        self.row_ids.extend(ids);
        self.rows.extend(rows);
        self.refresh();
    }

    fn assign_ids(&self, rows: &[T], offset: usize) -> Vec<RowId> {
        match &self.row_key {
            Some(key) => rows.iter().map(|row| RowId::new(key(row))).collect(),
            None => (offset..offset + rows.len()).map(RowId::from).collect(),
        }
    }

    // =========================================================================
    // Export and commands
    // =========================================================================

    /// Exports every filtered row with the visible columns.
    ///
    /// Uses the table's export file name options. Table state is untouched
    /// whether or not the export succeeds.
    pub fn export(&self, format: ExportFormat) -> Result<ExportPayload, ExportError> {
        let mut options = ExportOptions::new(self.options.export_filename.clone());
        if self.options.export_date_suffix {
            options = options.dated_today();
        }
        self.export_with(format, &options)
    }

    /// Exports every filtered row with the visible columns and explicit options.
    pub fn export_with(&self, format: ExportFormat, options: &ExportOptions) -> Result<ExportPayload, ExportError> {
        let rows = self.filtered_rows();
        let columns = self.visible_columns();
        export::export(format, &rows, &columns, options)
    }

    /// Runs a shortcut command.
    pub fn apply_command(&mut self, command: TableCommand) -> Result<CommandEffect, ExportError> {
        match command {
            TableCommand::SelectAllOnPage if self.options.enable_row_selection => {
                self.toggle_all_on_page();
                Ok(CommandEffect::Handled)
            }
            TableCommand::SelectAllOnPage => Ok(CommandEffect::Ignored),
            TableCommand::FocusSearch => Ok(CommandEffect::FocusSearch),
            TableCommand::ExportExcel => self.export(ExportFormat::Excel).map(CommandEffect::Exported),
        }
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Re-derives the filtered, sorted view and fixes up dependent state.
    fn refresh(&mut self) {
        let mut view = self.filter_indices(None);
        self.sort_indices(&mut view);
        self.view = view;

        let present: HashSet<&RowId> = self.row_ids.iter().collect();
        let dropped = self.state.row_selection.retain(|id| present.contains(id));
        if dropped > 0 {
            log::debug!("[table] dropped {} selected rows no longer in the row set", dropped);
            self.notify_selection();
        }

        if self.state.pagination.clamp(self.view.len()) {
            log::debug!(
                "[table] clamped page index to {}",
                self.state.pagination.page_index
            );
        }
    }

    /// Indices of rows passing every filter, in row order.
    ///
    /// `skip` leaves one column's own filter out (used for faceting).
    pub(crate) fn filter_indices(&self, skip: Option<&str>) -> Vec<usize> {
        let active: Vec<(&Column<T>, &ColumnFilter)> = self
            .state
            .column_filters
            .iter()
            .filter(|(id, filter)| Some(id.as_str()) != skip && !filter.is_empty())
            .filter_map(|(id, filter)| self.column(id).map(|c| (c, filter)))
            .collect();

        let needle = self.state.global_filter.to_lowercase();
        let searchable: Vec<&Column<T>> = self.columns.iter().filter(|c| c.can_filter()).collect();

        (0..self.rows.len())
            .filter(|&i| {
                let row = &self.rows[i];
                let columns_pass = active
                    .iter()
                    .all(|(column, filter)| column.matches(&column.value(row), filter));
                columns_pass
                    && (needle.is_empty()
                        || searchable.iter().any(|column| {
                            column
                                .search_string(&column.value(row))
                                .to_lowercase()
                                .contains(&needle)
                        }))
            })
            .collect()
    }

    fn sort_indices(&self, indices: &mut Vec<usize>) {
        let keys: Vec<(&Column<T>, Direction)> = self
            .state
            .sort
            .fields()
            .iter()
            .filter_map(|(id, direction)| self.column(id).map(|c| (c, *direction)))
            .collect();
        if keys.is_empty() {
            return;
        }

        let directions: Vec<Direction> = keys.iter().map(|(_, d)| *d).collect();
        let mut keyed: Vec<(usize, Vec<Value>)> = indices
            .iter()
            .map(|&i| (i, keys.iter().map(|(c, _)| c.value(&self.rows[i])).collect()))
            .collect();

        // `sort_by` is stable: ties keep their filtered order
        keyed.sort_by(|a, b| order::compare_keys(&a.1, &b.1, &directions));
        *indices = keyed.into_iter().map(|(i, _)| i).collect();
    }
}
