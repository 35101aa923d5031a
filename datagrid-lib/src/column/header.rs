//! Column headers.

use std::fmt;
use std::sync::Arc;

use crate::table::Direction;

/// What a header render function can see about its column and table.
#[derive(Debug, Clone, Copy)]
pub struct HeaderContext<'a> {
    /// The column id.
    pub column_id: &'a str,
    /// Current sort direction of this column, if sorted.
    pub sort: Option<Direction>,
    /// Position of this column in a multi-column sort (0 = most significant).
    pub sort_index: Option<usize>,
    /// Whether every row on the current page is selected.
    pub all_page_rows_selected: bool,
    /// Whether some but not all rows on the current page are selected.
    pub some_page_rows_selected: bool,
}

/// A column header: a static label or a render function.
///
/// Render-function headers always carry a plain-text label so exports and
/// plain renderers have something to print.
#[derive(Clone)]
pub enum Header {
    Label(String),
    Render {
        label: String,
        render: Arc<dyn Fn(&HeaderContext<'_>) -> String + Send + Sync>,
    },
}

impl Header {
    /// The plain-text label.
    pub fn label(&self) -> &str {
        match self {
            Header::Label(label) => label,
            Header::Render { label, .. } => label,
        }
    }

    /// Renders the header for display.
    pub fn render(&self, cx: &HeaderContext<'_>) -> String {
        match self {
            Header::Label(label) => label.clone(),
            Header::Render { render, .. } => render(cx),
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Header::Label(label) => f.debug_tuple("Label").field(label).finish(),
            Header::Render { label, .. } => f.debug_struct("Render").field("label", label).finish_non_exhaustive(),
        }
    }
}
