//! Error types

mod config;
mod export;
mod field;
mod preference;

pub use config::*;
pub use export::*;
pub use field::*;
pub use preference::*;
