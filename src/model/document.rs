//! Document-level types.

use crate::detect::{detect_dialect, Dialect};
use crate::error::Result;
use std::path::PathBuf;

/// A document read from disk.
///
/// Documents are read-only and rebuilt on every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path the document was read from
    pub path: PathBuf,

    /// Raw text content
    pub text: String,
}

impl Document {
    /// Create a document from a path and its contents.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Dialect implied by the document's suffix.
    pub fn dialect(&self) -> Result<Dialect> {
        detect_dialect(&self.path)
    }

    /// Check if the document has no text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}
