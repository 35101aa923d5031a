//! SQLite preference backend with in-memory cache.

use std::path::Path;
use std::sync::Mutex;

use dashmap::DashMap;
use rusqlite::Connection;
use rusqlite::OptionalExtension;

use super::PreferenceBackend;
use crate::error::PreferenceError;

/// SQLite-backed preference storage with DashMap cache.
///
/// Data persists across process restarts.
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::prefs::{Preferences, SqliteBackend};
///
/// let prefs = Preferences::new(SqliteBackend::open("preferences.db")?);
/// ```
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens a backend at the given path, creating the file and table if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        Self::init(Connection::open(path)?)
    }

    /// Opens an in-memory backend. Useful for testing.
    pub fn open_in_memory() -> Result<Self, PreferenceError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, PreferenceError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            cache: DashMap::new(),
        })
    }

    fn with_conn<R>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<R>,
    ) -> Result<R, PreferenceError> {
        let conn = self.conn.lock().map_err(|_| PreferenceError::Poisoned)?;
        Ok(f(&conn)?)
    }
}

impl PreferenceBackend for SqliteBackend {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError> {
        // Check cache first
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let result = self.with_conn(|conn| {
            conn.query_row("SELECT value FROM preferences WHERE key = ?", [key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()
        })?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferenceError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO preferences (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, &value],
            )
        })?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.with_conn(|conn| conn.execute("DELETE FROM preferences WHERE key = ?", [key]))?;
        self.cache.remove(key);
        Ok(())
    }
}
