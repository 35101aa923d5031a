//! Preference store for per-table settings.
//!
//! [`Preferences`] wraps a byte-level [`PreferenceBackend`] with typed JSON
//! serialization. Tables use it to remember column visibility across
//! sessions under `{key}_columnVisibility`.
//!
//! # Example
//!
//! ```
//! use datagrid_lib::prefs::{MemoryBackend, Preferences};
//! use datagrid_lib::table::ColumnVisibility;
//!
//! let prefs = Preferences::new(MemoryBackend::new());
//! assert!(prefs.load("users").is_none());
//!
//! let visibility: ColumnVisibility = [("risk_score", false)].into_iter().collect();
//! prefs.save("users", &visibility).unwrap();
//! assert_eq!(prefs.load("users"), Some(visibility));
//! ```

mod backend;
mod memory;
mod sqlite;

pub use backend::PreferenceBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PreferenceError;
use crate::table::ColumnVisibility;

/// Suffix appended to a table's preference key for its column visibility.
pub const VISIBILITY_SUFFIX: &str = "_columnVisibility";

/// Typed preference provider.
#[derive(Clone)]
pub struct Preferences {
    backend: Arc<dyn PreferenceBackend>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    /// Create a new preference provider with the given backend.
    pub fn new(backend: impl PreferenceBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Get a typed value for a key.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PreferenceError> {
        match self.backend.get_bytes(key)? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(PreferenceError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Set a typed value for a key.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let bytes = serde_json::to_vec(value).map_err(PreferenceError::Serialization)?;
        self.backend.set_bytes(key, bytes)
    }

    /// Loads the saved column visibility for a table.
    ///
    /// A missing, unreadable or corrupt entry is "no preference": it is logged
    /// and `None` is returned.
    pub fn load(&self, key: &str) -> Option<ColumnVisibility> {
        let storage_key = visibility_key(key);
        match self.get::<ColumnVisibility>(&storage_key) {
            Ok(visibility) => visibility,
            Err(e) => {
                log::warn!("[prefs] ignoring stored preference '{}': {}", storage_key, e);
                None
            }
        }
    }

    /// Saves the column visibility for a table.
    pub fn save(&self, key: &str, visibility: &ColumnVisibility) -> Result<(), PreferenceError> {
        self.set(&visibility_key(key), visibility)
    }

    /// Removes the saved column visibility for a table.
    pub fn forget(&self, key: &str) -> Result<(), PreferenceError> {
        self.backend.delete(&visibility_key(key))
    }
}

fn visibility_key(key: &str) -> String {
    format!("{}{}", key, VISIBILITY_SUFFIX)
}
