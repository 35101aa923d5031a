//! XLSX encoding.

use rust_xlsxwriter::Format;
use rust_xlsxwriter::Workbook;

use crate::column::Column;
use crate::error::ExportError;
use crate::model::Value;

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Single worksheet: bold header row, then one typed cell per value.
///
/// Numbers, booleans and dates keep their cell type; `Null` and non-finite
/// floats leave the cell blank.
pub(super) fn encode<T>(rows: &[&T], columns: &[&Column<T>], sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    if rows.len() + 1 > MAX_ROWS || columns.len() > MAX_COLUMNS {
        return Err(ExportError::TooLarge {
            format: "xlsx",
            rows: rows.len(),
            columns: columns.len(),
        });
    }

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    for (col_idx, column) in columns.iter().enumerate() {
        // Bounded by MAX_COLUMNS / MAX_ROWS above
        let col = col_idx as u16;
        sheet.write_string_with_format(0, col, column.label(), &header_format)?;

        for (row_idx, row) in rows.iter().enumerate() {
            let r = (row_idx + 1) as u32;
            match column.value(row) {
                Value::Null => {}
                Value::Bool(b) => {
                    sheet.write_boolean(r, col, b)?;
                }
                Value::Int(n) => {
                    sheet.write_number(r, col, n as f64)?;
                }
                Value::Float(n) if n.is_finite() => {
                    sheet.write_number(r, col, n)?;
                }
                Value::Float(_) => {}
                Value::String(s) => {
                    sheet.write_string(r, col, s)?;
                }
                Value::DateTime(dt) => {
                    sheet.write_datetime_with_format(r, col, &dt.naive_utc(), &date_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
