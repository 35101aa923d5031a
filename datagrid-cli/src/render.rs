//! Plain-text table rendering.

use datagrid_lib::Table;
use datagrid_lib::column::Alignment;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Longest cell text before truncation.
const MAX_CELL_WIDTH: usize = 40;

/// Renders the current page: header, separator, rows, a page footer and the
/// page sizes on offer.
pub fn render_page<T>(table: &Table<T>) -> String {
    let columns = table.visible_columns();
    let page = table.page();

    let headers: Vec<String> = columns.iter().map(|c| table.render_header(c)).collect();
    let cells: Vec<Vec<String>> = page
        .rows()
        .into_iter()
        .map(|row| columns.iter().map(|c| truncate(&c.render_cell(row))).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let data = cells.iter().map(|row| width(&row[i])).max().unwrap_or(0);
            let hint = columns[i].width_hint().map(usize::from).unwrap_or(0);
            width(header).max(data).max(hint)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths, |_| Alignment::Left);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &separator, &widths, |_| Alignment::Left);

    if cells.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &cells {
        push_line(&mut out, row, &widths, |i| columns[i].alignment());
    }

    out.push_str(&footer(table));
    out.push('\n');
    out.push_str(&page_sizes(table));
    out.push('\n');
    out
}

/// `Rows per page: 10 [20] 30 50 100`, current size bracketed.
pub fn page_sizes<T>(table: &Table<T>) -> String {
    let current = table.state().pagination().page_size;
    let sizes: Vec<String> = table
        .page_size_options()
        .into_iter()
        .map(|size| if size == current { format!("[{}]", size) } else { size.to_string() })
        .collect();
    format!("Rows per page: {}", sizes.join(" "))
}

/// `Page 2 of 3 · 25 rows (of 40)`.
pub fn footer<T>(table: &Table<T>) -> String {
    let page = table.page();
    let total = table.rows().len();
    let mut footer = format!(
        "Page {} of {} · {} rows",
        page.page_index() + 1,
        page.page_count(),
        page.total_filtered_count()
    );
    if page.total_filtered_count() != total {
        footer.push_str(&format!(" (of {})", total));
    }
    footer
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], align: impl Fn(usize) -> Alignment) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, w))| pad(cell, *w, align(i)))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn pad(text: &str, target: usize, align: Alignment) -> String {
    let fill = target.saturating_sub(width(text));
    match align {
        Alignment::Left => format!("{}{}", text, " ".repeat(fill)),
        Alignment::Right => format!("{}{}", " ".repeat(fill), text),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

fn width(text: &str) -> usize {
    text.width()
}

fn truncate(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if width(&single_line) <= MAX_CELL_WIDTH {
        return single_line;
    }
    let mut cut = String::new();
    let mut used = 0;
    for c in single_line.chars() {
        used += c.width().unwrap_or(0);
        if used > MAX_CELL_WIDTH - 1 {
            break;
        }
        cut.push(c);
    }
    cut.push('…');
    cut
}
