//! Document dialect detection and validated reading.

use crate::error::{Error, Result};
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Markup dialect of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// LaTeX source (the authoring format)
    Native,
    /// HTML produced by the external converter
    Converted,
}

impl Dialect {
    /// File extension for this dialect, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Native => "tex",
            Dialect::Converted => "html",
        }
    }

    /// Look up a dialect by file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "tex" => Some(Dialect::Native),
            "html" => Some(Dialect::Converted),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Native => write!(f, "LaTeX"),
            Dialect::Converted => write!(f, "HTML"),
        }
    }
}

/// Detect the dialect of a document from its suffix.
///
/// # Example
/// ```
/// use tex2model::detect::{detect_dialect, Dialect};
///
/// assert_eq!(detect_dialect("model.tex").unwrap(), Dialect::Native);
/// assert_eq!(detect_dialect("model.html").unwrap(), Dialect::Converted);
/// assert!(detect_dialect("model.md").is_err());
/// ```
pub fn detect_dialect<P: AsRef<Path>>(path: P) -> Result<Dialect> {
    let path = path.as_ref();
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Dialect::from_extension)
        .ok_or_else(|| Error::UnknownDialect {
            path: path.to_path_buf(),
        })
}

/// Check that `path` is an existing file, optionally of the given dialect.
///
/// Existence is checked before the extension so a missing file is always
/// reported as [`Error::NotFound`].
pub fn check_file<P: AsRef<Path>>(path: P, expected: Option<Dialect>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    if let Some(dialect) = expected {
        let actual = path.extension().and_then(|e| e.to_str());
        if actual != Some(dialect.extension()) {
            return Err(Error::ExtensionMismatch {
                path: path.to_path_buf(),
                expected: dialect.extension().to_string(),
                actual: actual.map(|e| format!(".{}", e)).unwrap_or_default(),
            });
        }
    }

    Ok(path.to_path_buf())
}

/// Read a whole document after validating it with [`check_file`].
pub fn read_document<P: AsRef<Path>>(path: P, expected: Option<Dialect>) -> Result<Document> {
    let path = check_file(path, expected)?;
    let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound { path: path.clone() },
        _ => Error::Io(e),
    })?;
    Ok(Document::new(path, text))
}

/// Sibling path of `path` carrying the suffix of `dialect`.
pub fn sibling_path(path: &Path, dialect: Dialect) -> PathBuf {
    path.with_extension(dialect.extension())
}
