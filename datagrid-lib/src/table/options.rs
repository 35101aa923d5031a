//! Table configuration

/// Default page size options offered by the page-size picker.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 50, 100];

/// Configuration for one table instance.
///
/// # Example
///
/// ```
/// use datagrid_lib::TableOptions;
///
/// let options = TableOptions::default()
///     .with_page_size(50)
///     .with_row_selection(true)
///     .with_preferences_key("usersTable");
/// assert_eq!(options.page_size, 50);
/// ```
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Sizes offered by a page-size picker.
    ///
    /// Default: `[10, 20, 30, 50, 100]`
    pub page_size_options: Vec<usize>,

    /// Whether rows can be selected.
    ///
    /// Default: false
    pub enable_row_selection: bool,

    /// Whether column visibility is loaded from and saved to the preference store.
    ///
    /// Default: true (has no effect without a store)
    pub persist_preferences: bool,

    /// Key under which column visibility is persisted.
    ///
    /// Default: `dataTablePrefs`
    pub preferences_key: String,

    /// Base file name for exports.
    ///
    /// Default: `export`
    pub export_filename: String,

    /// Whether export file names get a `-YYYY-MM-DD` suffix.
    ///
    /// Default: false
    pub export_date_suffix: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            enable_row_selection: false,
            persist_preferences: true,
            preferences_key: "dataTablePrefs".to_string(),
            export_filename: "export".to_string(),
            export_date_suffix: false,
        }
    }
}

impl TableOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the page sizes offered by a picker.
    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// Enables or disables row selection.
    pub fn with_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    /// Enables or disables preference persistence.
    pub fn with_persist_preferences(mut self, persist: bool) -> Self {
        self.persist_preferences = persist;
        self
    }

    /// Sets the preference key.
    pub fn with_preferences_key(mut self, key: impl Into<String>) -> Self {
        self.preferences_key = key.into();
        self
    }

    /// Sets the export base file name.
    pub fn with_export_filename(mut self, filename: impl Into<String>) -> Self {
        self.export_filename = filename.into();
        self
    }

    /// Enables or disables the date suffix on export file names.
    pub fn with_export_date_suffix(mut self, enabled: bool) -> Self {
        self.export_date_suffix = enabled;
        self
    }
}
