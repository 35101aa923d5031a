//! CSV encoding.

use ::csv::Terminator;
use ::csv::WriterBuilder;

use crate::column::Column;
use crate::error::ExportError;

/// Header row of labels, one record per row, CRLF line endings.
///
/// Quoting is left to the `csv` writer, which only quotes fields holding a
/// delimiter, quote or line break and doubles embedded quotes. `Null` cells
/// are empty fields.
pub(super) fn encode<T>(rows: &[&T], columns: &[&Column<T>]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.label()))?;

    for row in rows {
        writer.write_record(columns.iter().map(|column| column.value(row).to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Finish(e.to_string()))
}
