//! Data model for extracted tables.
//!
//! These types are the externally visible result of the pipeline and are
//! independent of the dialect the data was read from.

mod collection;
mod document;
mod table;

pub use collection::{fallback_identifier, TableCollection, TableIdentifier};
pub use document::Document;
pub use table::TabularData;
