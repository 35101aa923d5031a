//! In-memory preference backend using DashMap

use dashmap::DashMap;

use super::PreferenceBackend;
use crate::error::PreferenceError;

/// An in-memory backend. Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferenceError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.store.remove(key);
        Ok(())
    }
}
