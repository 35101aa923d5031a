//! Generic data-grid engine
//!
//! A declarative column model drives filtering, sorting, pagination, row
//! selection, faceting and export over caller-supplied rows. Column visibility
//! can be persisted across sessions through a [`prefs::Preferences`] store.

pub mod action;
pub mod column;
pub mod error;
pub mod export;
pub mod model;
pub mod prefs;
pub mod table;

pub use column::Column;
pub use column::Header;
pub use export::ExportFormat;
pub use export::ExportPayload;
pub use model::RowId;
pub use model::Value;
pub use table::Table;
pub use table::TableOptions;
