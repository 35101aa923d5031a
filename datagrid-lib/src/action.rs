//! Bulk actions and keyboard shortcuts.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Visual weight of a bulk action button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionVariant {
    #[default]
    Default,
    Danger,
}

/// An action run against the selected rows.
///
/// # Example
///
/// ```
/// use datagrid_lib::action::{ActionVariant, BulkAction};
///
/// struct User { telegram_id: String }
///
/// let suspend = BulkAction::new("Suspend", |users: &[&User]| {
///     for user in users {
///         println!("suspending {}", user.telegram_id);
///     }
/// })
/// .variant(ActionVariant::Danger);
/// assert_eq!(suspend.label(), "Suspend");
/// ```
pub struct BulkAction<T> {
    label: String,
    variant: ActionVariant,
    handler: Arc<dyn Fn(&[&T]) + Send + Sync>,
}

impl<T> Clone for BulkAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            variant: self.variant,
            handler: self.handler.clone(),
        }
    }
}

impl<T> fmt::Debug for BulkAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("label", &self.label)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl<T> BulkAction<T> {
    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[&T]) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            variant: ActionVariant::Default,
            handler: Arc::new(handler),
        }
    }

    pub fn variant(mut self, variant: ActionVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action_variant(&self) -> ActionVariant {
        self.variant
    }

    pub(crate) fn run(&self, rows: &[&T]) {
        (self.handler)(rows)
    }
}

/// Commands a table responds to from keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    /// Toggle selection of every row on the current page.
    SelectAllOnPage,
    /// Move focus to the global search input (handled by the renderer).
    FocusSearch,
    /// Export the filtered rows as an Excel workbook.
    ExportExcel,
}

/// A key combination such as `ctrl+shift+e`.
///
/// `cmd` (macOS) and `ctrl` are treated alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    /// A key with the ctrl/cmd modifier.
    pub const fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
            alt: false,
        }
    }

    /// Add shift modifier
    pub const fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// The table command bound to this shortcut, if any.
    pub fn command(&self) -> Option<TableCommand> {
        if !self.ctrl || self.alt {
            return None;
        }
        match (self.key, self.shift) {
            ('a', false) => Some(TableCommand::SelectAllOnPage),
            ('f', false) => Some(TableCommand::FocusSearch),
            ('e', true) => Some(TableCommand::ExportExcel),
            _ => None,
        }
    }
}

impl FromStr for Shortcut {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut shortcut = Shortcut {
            key: '\0',
            ctrl: false,
            shift: false,
            alt: false,
        };

        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "cmd" | "meta" => shortcut.ctrl = true,
                "shift" => shortcut.shift = true,
                "alt" | "option" => shortcut.alt = true,
                key => {
                    let mut chars = key.chars();
                    match (chars.next(), chars.next(), shortcut.key) {
                        (Some(c), None, '\0') => shortcut.key = c,
                        _ => return Err(format!("invalid shortcut '{}'", s)),
                    }
                }
            }
        }

        if shortcut.key == '\0' {
            return Err(format!("shortcut '{}' has no key", s));
        }
        Ok(shortcut)
    }
}

/// What the caller should do after a command ran.
#[derive(Debug)]
pub enum CommandEffect {
    /// The table handled it; re-render.
    Handled,
    /// The command does not apply (e.g. selection disabled).
    Ignored,
    /// Focus the global search input.
    FocusSearch,
    /// An export finished; save the payload.
    Exported(crate::ExportPayload),
}
