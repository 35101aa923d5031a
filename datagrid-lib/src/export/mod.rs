//! Export of table rows to CSV, JSON and Excel.
//!
//! Exports only see accessor-backed columns; structural columns (selection
//! checkboxes, row actions) are always skipped. [`Table::export`] feeds this
//! module the whole filtered set and the visible columns in on-screen order.
//!
//! [`Table::export`]: crate::Table::export

mod csv;
mod excel;
mod json;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::column::Column;
use crate::error::ExportError;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON array
    Json,
    /// Excel workbook (XLSX)
    Excel,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "excel",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Naming options for an export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Base file name without extension.
    pub filename: String,
    /// Date appended to the file name as `-YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
    /// Worksheet name for Excel exports. Defaults to the file name.
    pub sheet_name: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: "export".to_string(),
            date: None,
            sheet_name: None,
        }
    }
}

impl ExportOptions {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Appends a date suffix to the file name.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Appends today's local date to the file name.
    pub fn dated_today(self) -> Self {
        self.with_date(chrono::Local::now().date_naive())
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Full file name for a format, e.g. `users-2024-05-01.csv`.
    pub fn file_name(&self, format: ExportFormat) -> String {
        match self.date {
            Some(date) => format!("{}-{}.{}", self.filename, date.format("%Y-%m-%d"), format.extension()),
            None => format!("{}.{}", self.filename, format.extension()),
        }
    }

    /// Worksheet name, cleaned to Excel's rules (31 chars, no `[]:*?/\`).
    pub fn sheet_name(&self) -> String {
        let raw = self.sheet_name.as_deref().unwrap_or(&self.filename);
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
            .take(31)
            .collect();
        let cleaned = cleaned.trim_matches('\'').trim();
        if cleaned.is_empty() {
            "Data".to_string()
        } else {
            cleaned.to_string()
        }
    }
}

/// A finished export, ready to be saved by the caller.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Number of data rows (header excluded).
    pub row_count: usize,
}

impl ExportPayload {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Serializes rows with the given columns.
///
/// Columns without an accessor are dropped; the rest keep their order.
pub fn export<T>(
    format: ExportFormat,
    rows: &[&T],
    columns: &[&Column<T>],
    options: &ExportOptions,
) -> Result<ExportPayload, ExportError> {
    let columns: Vec<&Column<T>> = columns.iter().copied().filter(|c| c.has_accessor()).collect();

    let bytes = match format {
        ExportFormat::Csv => csv::encode(rows, &columns)?,
        ExportFormat::Json => json::encode(rows, &columns)?,
        ExportFormat::Excel => excel::encode(rows, &columns, &options.sheet_name())?,
    };

    log::debug!(
        "[export] {} rows x {} columns as {} ({} bytes)",
        rows.len(),
        columns.len(),
        format,
        bytes.len()
    );

    Ok(ExportPayload {
        format,
        filename: options.file_name(format),
        bytes,
        row_count: rows.len(),
    })
}
