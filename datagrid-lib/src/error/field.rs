//! FieldError for column accessors

/// Error an accessor returns when it cannot produce a value for a row.
///
/// The table engine never propagates this: the failing cell is read as
/// [`Value::Null`](crate::Value::Null) and derivation continues with the
/// remaining rows.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FieldError {
    /// The requested field does not exist on the row.
    #[error("Field '{field}' not found in row")]
    Missing { field: String },

    /// The field exists but has a different type than the accessor expects.
    #[error("Field '{field}' type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Any other accessor failure.
    #[error("{0}")]
    Other(String),
}

impl FieldError {
    /// Creates a new missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Creates a free-form accessor error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
