//! Table configuration errors

/// A programmer error in the column model or table options.
///
/// Returned from [`Table::builder`](crate::Table::builder) `build()`; a table is
/// never constructed from an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two columns share the same id.
    #[error("Duplicate column id '{0}'")]
    DuplicateColumn(String),

    /// A column was explicitly marked sortable but has no accessor.
    #[error("Column '{0}' is sortable but has no accessor")]
    SortableWithoutAccessor(String),

    /// A column was explicitly marked filterable but has no accessor.
    #[error("Column '{0}' is filterable but has no accessor")]
    FilterableWithoutAccessor(String),

    /// The configured page size is zero.
    #[error("Page size must be positive")]
    ZeroPageSize,

    /// A column id referenced by the options or column order does not exist.
    #[error("Unknown column id '{0}'")]
    UnknownColumn(String),
}
