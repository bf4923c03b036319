//! Resolution options and configuration.

use regex::Regex;

use crate::error::Result;

/// How native identifiers are paired with converted data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PairingStrategy {
    /// Convert the whole document once and pair tables by position
    #[default]
    Positional,

    /// Convert each native tabular on its own; pairs by construction
    PerTable,
}

/// Options for resolving a document into a table collection.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Re-run the converter even if the HTML counterpart exists
    pub overwrite: bool,

    /// Pairing strategy for native documents
    pub pairing: PairingStrategy,

    /// Fail instead of warning when a positional pair looks mismatched
    pub strict_order: bool,

    /// Keep only tables whose identifier matches
    pub filter: Option<Regex>,
}

impl ResolveOptions {
    /// Create new resolve options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable overwriting the converted document.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the pairing strategy.
    pub fn with_pairing(mut self, pairing: PairingStrategy) -> Self {
        self.pairing = pairing;
        self
    }

    /// Pair tables by converting each one individually.
    pub fn per_table(mut self) -> Self {
        self.pairing = PairingStrategy::PerTable;
        self
    }

    /// Turn shape mismatches into errors.
    pub fn strict(mut self) -> Self {
        self.strict_order = true;
        self
    }

    /// Keep only tables whose identifier matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self> {
        self.filter = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Whether an identifier passes the filter.
    pub fn keeps(&self, identifier: &str) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |re| re.is_match(identifier))
    }
}
