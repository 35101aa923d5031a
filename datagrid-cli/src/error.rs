//! CLI error type.

use std::path::PathBuf;

use datagrid_lib::error::ConfigError;
use datagrid_lib::error::ExportError;
use thiserror::Error;

/// Anything that makes a `datagrid` invocation fail.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed but is not an array of objects.
    #[error("Input must be a JSON array of objects, found {0}")]
    Shape(&'static str),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
