//! Preference backend trait.

use crate::error::PreferenceError;

/// Backend trait for preference storage.
///
/// Implementations handle raw byte storage/retrieval.
/// [`Preferences`](super::Preferences) wraps this with typed serialization.
pub trait PreferenceBackend: Send + Sync {
    /// Get raw bytes for a key.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError>;

    /// Set raw bytes for a key.
    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferenceError>;

    /// Delete a key.
    fn delete(&self, key: &str) -> Result<(), PreferenceError>;
}
