//! Data model types

mod row;
mod value;

pub use row::*;
pub use value::*;
