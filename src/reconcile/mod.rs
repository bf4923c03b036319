//! Label-to-table reconciliation.
//!
//! Identifiers come from the LaTeX view of a document, cell data from its
//! HTML view; the [`Reconciler`] pairs the two.

mod options;

pub use options::{PairingStrategy, ResolveOptions};

use std::path::Path;
use std::sync::Arc;

use crate::convert::{DocumentConverter, FormatBridge};
use crate::detect::{check_file, detect_dialect, read_document, Dialect};
use crate::error::{Error, Result};
use crate::model::{TableCollection, TableIdentifier, TabularData};
use crate::parser::{
    extract_table_fragment, parse_native, resolve_identifiers, HtmlTree, LatexTable, LatexTree,
    MarkupTree, StructuredTree,
};

/// Resolves documents into identifier-keyed table collections.
#[derive(Clone)]
pub struct Reconciler {
    bridge: FormatBridge,
    options: ResolveOptions,
}

impl Reconciler {
    /// Create a reconciler with default options.
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self::with_options(converter, ResolveOptions::default())
    }

    /// Create a reconciler with custom options.
    pub fn with_options(converter: Arc<dyn DocumentConverter>, options: ResolveOptions) -> Self {
        Self {
            bridge: FormatBridge::new(converter),
            options,
        }
    }

    /// Get the options.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve a `.tex` or `.html` document.
    ///
    /// A missing file is reported before the suffix is looked at.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<TableCollection> {
        let path = check_file(path, None)?;
        let mut collection = match detect_dialect(&path)? {
            Dialect::Native => self.resolve_native(&path)?,
            Dialect::Converted => self.resolve_converted(&path)?,
        };

        if self.options.filter.is_some() {
            let before = collection.len();
            collection.retain(|id| self.options.keeps(id));
            log::debug!("Filter kept {} of {} tables", collection.len(), before);
        }

        Ok(collection)
    }

    fn resolve_native(&self, path: &Path) -> Result<TableCollection> {
        let doc = read_document(path, Some(Dialect::Native))?;
        let tree = parse_native(&doc)?;
        let tables = tree.find_tables();
        let identifiers = resolve_identifiers(tables.iter().map(|t| tree.label_of(t)))?;
        log::debug!("Resolved identifiers {:?}", identifiers);

        let data = match self.options.pairing {
            PairingStrategy::Positional => self.positional_data(path, &tables, &identifiers)?,
            PairingStrategy::PerTable => self.per_table_data(&tree, &tables)?,
        };

        TableCollection::from_pairs(identifiers, data)
    }

    fn resolve_converted(&self, path: &Path) -> Result<TableCollection> {
        let doc = read_document(path, Some(Dialect::Converted))?;
        let tree = StructuredTree::build_as(&doc, Dialect::Converted)?;
        let data = tree.table_data()?.into_iter().flatten().collect();
        Ok(TableCollection::positional(data))
    }

    fn positional_data(
        &self,
        path: &Path,
        tables: &[LatexTable<'_>],
        identifiers: &[TableIdentifier],
    ) -> Result<Vec<TabularData>> {
        let html_path = self.bridge.ensure_converted(path, self.options.overwrite)?;
        let html_doc = read_document(&html_path, Some(Dialect::Converted))?;
        let html = HtmlTree::parse(&html_doc.text);
        let nodes = html.find_tables();

        if nodes.len() != tables.len() {
            return Err(Error::TableCountMismatch {
                native: tables.len(),
                converted: nodes.len(),
            });
        }

        let data = nodes
            .into_iter()
            .map(|node| html.table_data(node))
            .collect::<Result<Vec<_>>>()?;

        for (index, (table, converted)) in tables.iter().zip(&data).enumerate() {
            self.check_shape(index, &identifiers[index], table, converted)?;
        }

        Ok(data)
    }

    /// Compare row counts of a positional pair. The converted view may have
    /// lifted the first row into column labels.
    fn check_shape(
        &self,
        index: usize,
        identifier: &str,
        table: &LatexTable<'_>,
        converted: &TabularData,
    ) -> Result<()> {
        let native_rows = table.row_count();
        let converted_rows = converted.row_count();
        if native_rows == converted_rows || native_rows == converted_rows + 1 {
            return Ok(());
        }

        if self.options.strict_order {
            return Err(Error::TableOrderMismatch {
                index,
                identifier: identifier.to_string(),
                native_rows,
                converted_rows,
            });
        }

        log::warn!(
            "Table {} ('{}') has {} LaTeX rows but {} HTML rows; tables may be paired out of order",
            index,
            identifier,
            native_rows,
            converted_rows
        );
        Ok(())
    }

    fn per_table_data(
        &self,
        tree: &LatexTree,
        tables: &[LatexTable<'_>],
    ) -> Result<Vec<TabularData>> {
        let converter = self.bridge.converter();
        tables
            .iter()
            .map(|table| {
                let fragment = converter.convert_fragment(tree.source_of(table.node))?;
                extract_table_fragment(&fragment)
            })
            .collect()
    }
}
