//! Row identity

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Stable identity of a row, used for selection.
///
/// Either the row's index in the row set the table was given, or a key the
/// caller derives from the row (see
/// [`TableBuilder::row_key`](crate::table::TableBuilder::row_key)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id from a caller key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

impl From<&str> for RowId {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for RowId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
