//! Error types for tex2model library.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for tex2model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting and reconciling tables.
///
/// Every error is fatal to the current invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The path does not reference an existing file.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file suffix differs from the one required.
    #[error("Extension mismatch for {}: expected '.{expected}', found '{actual}'", path.display())]
    ExtensionMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The file suffix does not map to a known dialect.
    #[error("Unknown document dialect for {} (expected .tex or .html)", path.display())]
    UnknownDialect { path: PathBuf },

    /// The document text could not be parsed into a tree.
    #[error("Malformed document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// Two tables resolved to the same identifier.
    #[error("Duplicate table identifier '{identifier}' (tables {first} and {second})")]
    DuplicateIdentifier {
        identifier: String,
        first: usize,
        second: usize,
    },

    /// The native and converted views disagree on how many tables exist.
    #[error("Table count mismatch: native document has {native} tables, converted document has {converted}")]
    TableCountMismatch { native: usize, converted: usize },

    /// A positional pair failed the shape check (strict mode only).
    #[error("Table {index} ('{identifier}') looks different across views: {native_rows} native rows vs {converted_rows} converted rows")]
    TableOrderMismatch {
        index: usize,
        identifier: String,
        native_rows: usize,
        converted_rows: usize,
    },

    /// A table node did not yield exactly one tabular structure.
    #[error("Expected exactly one table, found {found}")]
    AmbiguousTable { found: usize },

    /// The external converter could not be started.
    #[error("Converter '{program}' is unavailable: {reason}")]
    ConverterUnavailable { program: String, reason: String },

    /// The external converter ran but did not produce the expected output.
    #[error("Conversion to {} failed: {reason}", path.display())]
    ConversionFailed { path: PathBuf, reason: String },

    /// The external converter exceeded its time budget and was killed.
    #[error("Converter '{program}' timed out after {timeout:?}")]
    ConverterTimeout { program: String, timeout: Duration },

    /// The table filter pattern is not a valid regular expression.
    #[error("Invalid table filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    /// Error during rendering (text, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
