//! Column model.
//!
//! A [`Column`] describes how one column reads, renders, filters and sorts a
//! row. Columns without an accessor are structural (selection checkboxes, row
//! action buttons): they render but never take part in sorting, filtering or
//! export.
//!
//! # Example
//!
//! ```
//! use datagrid_lib::Column;
//! use datagrid_lib::column::Alignment;
//!
//! struct User {
//!     username: Option<String>,
//!     bits: i64,
//! }
//!
//! let columns: Vec<Column<User>> = vec![
//!     Column::accessor("username", |u: &User| u.username.clone()).header("User"),
//!     Column::accessor("bits", |u: &User| u.bits)
//!         .header("Total Bits")
//!         .align(Alignment::Right)
//!         .width(12),
//!     Column::new("actions").cell(|_| "[...]".to_string()),
//! ];
//! assert!(!columns[2].can_sort());
//! ```

mod header;

pub use header::Header;
pub use header::HeaderContext;

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::error::FieldError;
use crate::model::Value;
use crate::table::ColumnFilter;

/// Reads a cell value from a row.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Result<Value, FieldError> + Send + Sync>;

/// Renders a row's cell as display text.
pub type CellRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Overrides the default column filter predicate.
pub type FilterFn = Arc<dyn Fn(&Value, &ColumnFilter) -> bool + Send + Sync>;

/// Overrides how a value is stringified for the global search.
pub type SearchFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column configuration.
///
/// `sortable` and `filterable` default to whether the column has an accessor.
/// Setting either to `true` on a structural column is rejected when the table
/// is built.
pub struct Column<T> {
    id: String,
    header: Header,
    accessor: Option<Accessor<T>>,
    cell: Option<CellRenderer<T>>,
    filter_fn: Option<FilterFn>,
    search_fn: Option<SearchFn>,
    sortable: Option<bool>,
    filterable: Option<bool>,
    hideable: Option<bool>,
    width: Option<u16>,
    align: Alignment,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
            filter_fn: self.filter_fn.clone(),
            search_fn: self.search_fn.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            hideable: self.hideable,
            width: self.width,
            align: self.align,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("has_accessor", &self.accessor.is_some())
            .field("sortable", &self.can_sort())
            .field("filterable", &self.can_filter())
            .field("width", &self.width)
            .field("align", &self.align)
            .finish()
    }
}

impl<T> Column<T> {
    /// Creates a structural column with no accessor.
    ///
    /// The header defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: Header::Label(id.clone()),
            id,
            accessor: None,
            cell: None,
            filter_fn: None,
            search_fn: None,
            sortable: None,
            filterable: None,
            hideable: None,
            width: None,
            align: Alignment::Left,
        }
    }

    /// Creates a column reading its value with an infallible accessor.
    pub fn accessor<V, F>(id: impl Into<String>, f: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let mut column = Self::new(id);
        column.accessor = Some(Arc::new(move |row| Ok(f(row).into())));
        column
    }

    /// Creates a column reading its value with a fallible accessor.
    ///
    /// A row for which the accessor fails reads as [`Value::Null`].
    pub fn try_accessor<V, F>(id: impl Into<String>, f: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> Result<V, FieldError> + Send + Sync + 'static,
    {
        let mut column = Self::new(id);
        column.accessor = Some(Arc::new(move |row| f(row).map(Into::into)));
        column
    }

    /// Sets a static header label.
    pub fn header(mut self, label: impl Into<String>) -> Self {
        self.header = Header::Label(label.into());
        self
    }

    /// Sets a header render function with a plain-text fallback label.
    ///
    /// The label is what exports use as the column title.
    pub fn header_with<F>(mut self, label: impl Into<String>, render: F) -> Self
    where
        F: Fn(&HeaderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.header = Header::Render {
            label: label.into(),
            render: Arc::new(render),
        };
        self
    }

    /// Sets the cell render function.
    pub fn cell<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(f));
        self
    }

    /// Replaces the default predicate used for this column's filter.
    pub fn filter_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ColumnFilter) -> bool + Send + Sync + 'static,
    {
        self.filter_fn = Some(Arc::new(f));
        self
    }

    /// Replaces the stringification used by the global search.
    pub fn search_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.search_fn = Some(Arc::new(f));
        self
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    /// Sets whether the column is filterable.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    /// Sets whether the column can be hidden from the column picker.
    pub fn hideable(mut self, hideable: bool) -> Self {
        self.hideable = Some(hideable);
        self
    }

    /// Sets the fixed layout width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header_def(&self) -> &Header {
        &self.header
    }

    /// Plain-text header label, used by exports and text renderers.
    pub fn label(&self) -> &str {
        self.header.label()
    }

    pub fn width_hint(&self) -> Option<u16> {
        self.width
    }

    pub fn alignment(&self) -> Alignment {
        self.align
    }

    /// Returns `true` if the column reads a value from rows.
    pub fn has_accessor(&self) -> bool {
        self.accessor.is_some()
    }

    pub fn can_sort(&self) -> bool {
        self.sortable.unwrap_or(self.accessor.is_some())
    }

    pub fn can_filter(&self) -> bool {
        self.filterable.unwrap_or(self.accessor.is_some())
    }

    pub fn can_hide(&self) -> bool {
        self.hideable.unwrap_or(self.accessor.is_some())
    }

    /// Checks the column declaration for programmer errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accessor.is_none() {
            if self.sortable == Some(true) {
                return Err(ConfigError::SortableWithoutAccessor(self.id.clone()));
            }
            if self.filterable == Some(true) {
                return Err(ConfigError::FilterableWithoutAccessor(self.id.clone()));
            }
        }
        Ok(())
    }

    /// Reads this column's value from a row.
    ///
    /// Returns `Null` for structural columns and for rows where the accessor
    /// errors or panics.
    pub fn value(&self, row: &T) -> Value {
        let Some(accessor) = &self.accessor else {
            return Value::Null;
        };

        match std::panic::catch_unwind(AssertUnwindSafe(|| accessor(row))) {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                log::debug!("[column] accessor '{}' failed: {}", self.id, e);
                Value::Null
            }
            Err(panic) => {
                log::warn!(
                    "[column] accessor '{}' panicked: {}",
                    self.id,
                    extract_panic_message(&panic)
                );
                Value::Null
            }
        }
    }

    /// Renders a row's cell.
    ///
    /// Falls back to the accessor value's display text when no cell renderer
    /// is set.
    pub fn render_cell(&self, row: &T) -> String {
        match &self.cell {
            Some(cell) => cell(row),
            None => self.value(row).to_string(),
        }
    }

    /// Stringifies a value for the global search.
    pub fn search_string(&self, value: &Value) -> String {
        match &self.search_fn {
            Some(f) => f(value),
            None => value.to_search_string(),
        }
    }

    /// Tests a value against a filter using this column's predicate.
    pub fn matches(&self, value: &Value, filter: &ColumnFilter) -> bool {
        match &self.filter_fn {
            Some(f) => f(value, filter),
            None => filter.matches(value),
        }
    }
}

/// Extracts a message from a panic payload.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        n: i64,
    }

    #[test]
    fn test_flags_default_to_accessor_presence() {
        let data: Column<Row> = Column::accessor("n", |r: &Row| r.n);
        let structural: Column<Row> = Column::new("select");
        assert!(data.can_sort() && data.can_filter() && data.can_hide());
        assert!(!structural.can_sort() && !structural.can_filter() && !structural.can_hide());
    }

    #[test]
    fn test_sortable_without_accessor_is_rejected() {
        let column: Column<Row> = Column::new("actions").sortable(true);
        assert_eq!(
            column.validate(),
            Err(ConfigError::SortableWithoutAccessor("actions".into()))
        );
    }

    #[test]
    fn test_failing_accessor_reads_null() {
        let column: Column<Row> = Column::try_accessor("n", |r: &Row| {
            if r.n < 0 {
                Err(FieldError::other("negative"))
            } else {
                Ok(r.n)
            }
        });
        assert_eq!(column.value(&Row { n: -1 }), Value::Null);
        assert_eq!(column.value(&Row { n: 3 }), Value::Int(3));
    }

    #[test]
    fn test_panicking_accessor_reads_null() {
        let column: Column<Row> = Column::accessor("n", |r: &Row| -> i64 {
            if r.n == 0 {
                panic!("boom");
            }
            r.n
        });
        assert_eq!(column.value(&Row { n: 0 }), Value::Null);
        assert_eq!(column.value(&Row { n: 1 }), Value::Int(1));
    }

    #[test]
    fn test_render_cell_falls_back_to_value() {
        let plain: Column<Row> = Column::accessor("n", |r: &Row| r.n);
        let custom: Column<Row> = Column::accessor("n", |r: &Row| r.n).cell(|r| format!("{}x", r.n));
        assert_eq!(plain.render_cell(&Row { n: 4 }), "4");
        assert_eq!(custom.render_cell(&Row { n: 4 }), "4x");
    }

    #[test]
    fn test_extract_panic_message_unknown() {
        let panic: Box<dyn Any + Send> = Box::new(42i32);
        assert_eq!(extract_panic_message(&panic), "Unknown panic");
    }
}
