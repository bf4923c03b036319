//! # tex2model
//!
//! Extraction of identifier-keyed tables from LaTeX model documents.
//!
//! A model document describes the sets, parameters, variables, objective and
//! constraints of an optimization problem as LaTeX tables. This library reads
//! the `\label` of each table from the LaTeX source and its cell data from
//! the HTML produced by pandoc, and pairs the two into a [`TableCollection`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use tex2model::{resolve_file, render};
//!
//! fn main() -> tex2model::Result<()> {
//!     let tables = resolve_file("model.tex")?;
//!
//!     for (id, table) in tables.iter() {
//!         println!("{}: {} rows", id, table.row_count());
//!     }
//!     println!("{}", render::to_markdown(&tables));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Label resolution**: `\label` inside or around each tabular, `TableN` otherwise
//! - **Converter injection**: any [`DocumentConverter`], pandoc by default
//! - **Cached conversion**: an existing sibling `.html` is reused unless overwritten
//! - **Output formats**: plain text, Markdown, JSON

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod reconcile;
pub mod render;

// Re-export commonly used types
pub use convert::{DocumentConverter, FormatBridge, MathMode, PandocConfig, PandocConverter};
pub use detect::{detect_dialect, Dialect};
pub use error::{Error, Result};
pub use model::{Document, TableCollection, TableIdentifier, TabularData};
pub use parser::{HtmlTree, LatexTree, MarkupTree, StructuredTree};
pub use reconcile::{PairingStrategy, Reconciler, ResolveOptions};
pub use render::JsonFormat;

use std::path::Path;
use std::sync::Arc;

/// Resolve the tables of a `.tex` or `.html` document using pandoc.
///
/// # Example
///
/// ```no_run
/// use tex2model::resolve_file;
///
/// let tables = resolve_file("model.tex").unwrap();
/// println!("Tables: {}", tables.len());
/// ```
pub fn resolve_file<P: AsRef<Path>>(path: P) -> Result<TableCollection> {
    resolve_file_with_options(path, ResolveOptions::default())
}

/// Resolve the tables of a document with custom options.
///
/// # Example
///
/// ```no_run
/// use tex2model::{resolve_file_with_options, ResolveOptions};
///
/// let options = ResolveOptions::new()
///     .with_overwrite(true)
///     .with_filter("^tbl:")
///     .unwrap();
/// let tables = resolve_file_with_options("model.tex", options).unwrap();
/// ```
pub fn resolve_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ResolveOptions,
) -> Result<TableCollection> {
    Reconciler::with_options(Arc::new(PandocConverter::new()), options).resolve(path)
}

/// Read tables from an HTML document, identified by position.
///
/// No converter is involved.
pub fn tables_from_html<P: AsRef<Path>>(path: P) -> Result<TableCollection> {
    let doc = detect::read_document(path, Some(Dialect::Converted))?;
    let tree = StructuredTree::build_as(&doc, Dialect::Converted)?;
    let data = tree.table_data()?.into_iter().flatten().collect();
    Ok(TableCollection::positional(data))
}
