//! Export error types

/// Errors that can occur while serializing rows for export.
///
/// An export failure never touches the table state.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV encoding failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// XLSX encoding failed.
    #[error("Excel export failed: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    /// The row set does not fit the target format.
    #[error("Export too large: {rows} rows x {columns} columns exceeds the {format} limits")]
    TooLarge {
        format: &'static str,
        rows: usize,
        columns: usize,
    },

    /// The in-memory writer could not be recovered after encoding.
    #[error("Failed to finish export: {0}")]
    Finish(String),
}
