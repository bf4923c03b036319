//! Structured-tree builders for the two document dialects.
//!
//! Both dialects implement [`MarkupTree`]; [`StructuredTree`] dispatches to
//! the right one based on the document's [`Dialect`].

mod html;
mod identity;
mod latex;

pub use html::{extract_table_fragment, HtmlTree};
pub use identity::resolve_identifiers;
pub use latex::{LatexNode, LatexTable, LatexTree, SyntaxError, TABULAR_ENVIRONMENTS};

use crate::detect::Dialect;
use crate::error::{Error, Result};
use crate::model::{Document, TabularData};

/// Operations shared by the dialect trees.
pub trait MarkupTree {
    /// Reference to one tabular region inside the tree.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Tabular regions in document order.
    fn find_tables(&self) -> Vec<Self::Node<'_>>;

    /// Cross-reference label of a table, if the dialect carries one.
    fn table_id(&self, node: Self::Node<'_>) -> Option<String>;

    /// Cell data of a table, if the dialect can provide it.
    fn table_data(&self, node: Self::Node<'_>) -> Result<Option<TabularData>>;
}

/// A parsed document in one of the two dialects.
pub enum StructuredTree {
    /// LaTeX tree
    Native(LatexTree),
    /// HTML tree
    Converted(HtmlTree),
}

impl StructuredTree {
    /// Parse a document according to its suffix.
    pub fn build(doc: &Document) -> Result<Self> {
        Self::build_as(doc, doc.dialect()?)
    }

    /// Parse a document as the given dialect.
    pub fn build_as(doc: &Document, dialect: Dialect) -> Result<Self> {
        if doc.is_empty() {
            log::warn!("{} has no content", doc.path.display());
        }
        let tree = match dialect {
            Dialect::Native => StructuredTree::Native(parse_native(doc)?),
            Dialect::Converted => StructuredTree::Converted(HtmlTree::parse(&doc.text)),
        };
        log::debug!(
            "Built {} tree for {} ({} lines): {} tables",
            dialect,
            doc.path.display(),
            doc.line_count(),
            tree.table_count()
        );
        Ok(tree)
    }

    /// Dialect of this tree.
    pub fn dialect(&self) -> Dialect {
        match self {
            StructuredTree::Native(_) => Dialect::Native,
            StructuredTree::Converted(_) => Dialect::Converted,
        }
    }

    /// Number of tabular regions.
    pub fn table_count(&self) -> usize {
        match self {
            StructuredTree::Native(tree) => tree.find_tables().len(),
            StructuredTree::Converted(tree) => tree.find_tables().len(),
        }
    }

    /// Data of every table, in discovery order.
    pub fn table_data(&self) -> Result<Vec<Option<TabularData>>> {
        match self {
            StructuredTree::Native(tree) => data(tree),
            StructuredTree::Converted(tree) => data(tree),
        }
    }
}

/// Parse a document as LaTeX, reporting syntax errors against its path.
pub fn parse_native(doc: &Document) -> Result<LatexTree> {
    LatexTree::parse(&doc.text).map_err(|e| Error::MalformedDocument {
        path: doc.path.clone(),
        reason: e.to_string(),
    })
}

fn data<T: MarkupTree>(tree: &T) -> Result<Vec<Option<TabularData>>> {
    tree.find_tables()
        .into_iter()
        .map(|node| tree.table_data(node))
        .collect()
}
