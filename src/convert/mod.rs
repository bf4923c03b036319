//! Bridge from LaTeX documents to their HTML counterparts.
//!
//! The conversion itself is delegated to a [`DocumentConverter`], injected
//! wherever a conversion may happen so tests can substitute a stub.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tex2model::convert::{FormatBridge, PandocConverter};
//!
//! fn main() -> tex2model::Result<()> {
//!     let bridge = FormatBridge::new(Arc::new(PandocConverter::new()));
//!     let html = bridge.ensure_converted("model.tex", false)?;
//!     println!("{}", html.display());
//!     Ok(())
//! }
//! ```

mod pandoc;

pub use pandoc::{MathMode, PandocConfig, PandocConverter};

use crate::detect::{check_file, sibling_path, Dialect};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Capability that turns LaTeX into HTML.
pub trait DocumentConverter: Send + Sync {
    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert the full document at `source`, writing HTML to `output`.
    fn convert_file(&self, source: &Path, output: &Path) -> Result<()>;

    /// Convert a LaTeX fragment and return the HTML fragment.
    fn convert_fragment(&self, latex: &str) -> Result<String>;
}

/// Produces converted documents next to their sources.
#[derive(Clone)]
pub struct FormatBridge {
    converter: Arc<dyn DocumentConverter>,
}

impl FormatBridge {
    /// Create a bridge around a converter.
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self { converter }
    }

    /// The converter in use.
    pub fn converter(&self) -> &Arc<dyn DocumentConverter> {
        &self.converter
    }

    /// Path of the converted counterpart of `document_path`.
    pub fn converted_path<P: AsRef<Path>>(document_path: P) -> PathBuf {
        sibling_path(document_path.as_ref(), Dialect::Converted)
    }

    /// Make sure the HTML counterpart of a LaTeX document exists.
    ///
    /// An existing counterpart is returned untouched unless `overwrite` is
    /// set; otherwise the converter runs once and its output is validated.
    pub fn ensure_converted<P: AsRef<Path>>(
        &self,
        document_path: P,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let source = check_file(document_path, Some(Dialect::Native))?;
        let output = Self::converted_path(&source);

        if output.is_file() && !overwrite {
            log::debug!("Reusing converted document {}", output.display());
            return Ok(output);
        }

        if output.is_file() {
            log::warn!("Overwriting converted document {}", output.display());
        }

        log::debug!(
            "Converting {} -> {} with {}",
            source.display(),
            output.display(),
            self.converter.name()
        );
        self.converter.convert_file(&source, &output)?;

        check_file(&output, Some(Dialect::Converted)).map_err(|e| match e {
            Error::NotFound { path } => Error::ConversionFailed {
                path,
                reason: format!(
                    "{} finished without producing the output file",
                    self.converter.name()
                ),
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a fixed HTML body and counts invocations.
    struct CountingConverter {
        calls: AtomicUsize,
        write_output: bool,
    }

    impl CountingConverter {
        fn new(write_output: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                write_output,
            }
        }
    }

    impl DocumentConverter for CountingConverter {
        fn name(&self) -> &str {
            "counting"
        }

        fn convert_file(&self, _source: &Path, output: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.write_output {
                fs::write(output, "<html></html>")?;
            }
            Ok(())
        }

        fn convert_fragment(&self, _latex: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_converted_path() {
        assert_eq!(
            FormatBridge::converted_path("docs/model.tex"),
            PathBuf::from("docs/model.html")
        );
    }

    #[test]
    fn test_missing_output_is_conversion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("model.tex");
        fs::write(&source, "x").unwrap();

        let bridge = FormatBridge::new(Arc::new(CountingConverter::new(false)));
        let result = bridge.ensure_converted(&source, false);
        assert!(matches!(result, Err(Error::ConversionFailed { .. })));
    }

    #[test]
    fn test_source_must_be_latex() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("model.html");
        fs::write(&source, "x").unwrap();

        let converter = Arc::new(CountingConverter::new(true));
        let bridge = FormatBridge::new(converter.clone());
        let result = bridge.ensure_converted(&source, false);
        assert!(matches!(result, Err(Error::ExtensionMismatch { .. })));
        assert_eq!(converter.calls.load(Ordering::SeqCst), 0);
    }
}
