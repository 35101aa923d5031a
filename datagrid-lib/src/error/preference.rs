//! Preference store error types

/// Errors raised by preference backends.
///
/// Loading treats every one of these as "no preference"; only saving and
/// deleting report them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),
    #[error("preference backend lock poisoned")]
    Poisoned,
}
