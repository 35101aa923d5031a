//! Page of table rows.

use crate::model::RowId;

/// The current page of a table: visible rows plus pagination info.
///
/// # Example
///
/// ```ignore
/// let page = table.page();
/// for (id, row) in page.iter() {
///     println!("{id}: {}", render(row));
/// }
/// println!("Page {} of {}", page.page_index() + 1, page.page_count());
/// ```
#[derive(Debug, Clone)]
pub struct Page<'a, T> {
    rows: Vec<(&'a RowId, &'a T)>,
    page_index: usize,
    page_size: usize,
    page_count: usize,
    total_filtered_count: usize,
}

impl<'a, T> Page<'a, T> {
    pub(crate) fn new(
        rows: Vec<(&'a RowId, &'a T)>,
        page_index: usize,
        page_size: usize,
        page_count: usize,
        total_filtered_count: usize,
    ) -> Self {
        Self {
            rows,
            page_index,
            page_size,
            page_count,
            total_filtered_count,
        }
    }

    /// Rows on this page, in display order.
    pub fn rows(&self) -> Vec<&'a T> {
        self.rows.iter().map(|(_, row)| *row).collect()
    }

    /// Row ids on this page, in display order.
    pub fn ids(&self) -> Vec<&'a RowId> {
        self.rows.iter().map(|(id, _)| *id).collect()
    }

    /// Iterates `(id, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'a RowId, &'a T)> + '_ {
        self.rows.iter().copied()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Rows matching the filters across all pages.
    pub fn total_filtered_count(&self) -> usize {
        self.total_filtered_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}
