//! HTML tree builder and tabular data extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::TabularData;

use super::MarkupTree;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parsed HTML document.
pub struct HtmlTree {
    html: Html,
}

impl HtmlTree {
    /// Parse a full HTML document. HTML parsing is error-tolerant.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parse an HTML fragment.
    pub fn parse_fragment(source: &str) -> Self {
        Self {
            html: Html::parse_fragment(source),
        }
    }

    /// All elements with the given tag name, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == tag)
            .collect()
    }

    /// Convert one node into tabular data.
    ///
    /// The node must contain exactly one `<table>` (itself included).
    pub fn table_data(&self, node: ElementRef<'_>) -> Result<TabularData> {
        let mut tables = node
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "table");
        let first = tables.next();
        let found = usize::from(first.is_some()) + tables.count();

        match first {
            Some(table) if found == 1 => Ok(read_table(table)),
            _ => Err(Error::AmbiguousTable { found }),
        }
    }
}

impl MarkupTree for HtmlTree {
    type Node<'a> = ElementRef<'a>;

    fn find_tables(&self) -> Vec<ElementRef<'_>> {
        self.find_all("table")
    }

    fn table_id(&self, _node: ElementRef<'_>) -> Option<String> {
        // The converter drops \label; converted tables are identified by position.
        None
    }

    fn table_data(&self, node: ElementRef<'_>) -> Result<Option<TabularData>> {
        HtmlTree::table_data(self, node).map(Some)
    }
}

/// Extract the single table of an HTML fragment.
pub fn extract_table_fragment(fragment: &str) -> Result<TabularData> {
    let tree = HtmlTree::parse_fragment(fragment);
    let root = tree.html.root_element();
    tree.table_data(root)
}

struct RowCells<'a> {
    cells: Vec<ElementRef<'a>>,
    in_head: bool,
}

/// Direct rows of a table (`<tr>` children or rows inside
/// `<thead>`/`<tbody>`/`<tfoot>`), skipping nested tables.
fn direct_rows<'a>(table: ElementRef<'a>) -> Vec<RowCells<'a>> {
    let mut rows = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(row_cells(child, false)),
            section @ ("thead" | "tbody" | "tfoot") => {
                for inner in child.children().filter_map(ElementRef::wrap) {
                    if inner.value().name() == "tr" {
                        rows.push(row_cells(inner, section == "thead"));
                    }
                }
            }
            _ => {}
        }
    }

    rows
}

fn row_cells(row: ElementRef<'_>, in_head: bool) -> RowCells<'_> {
    let cells = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect();
    RowCells { cells, in_head }
}

/// Limits the HTML table model places on `colspan` and `rowspan`.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

fn span_attr(cell: ElementRef<'_>, name: &str, max: usize) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

/// Normalized text of a cell.
fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    let collapsed = RE_WHITESPACE.replace_all(raw.trim(), " ");
    collapsed.nfc().collect()
}

/// Lay out rows on a grid, repeating spanned cells into every covered slot.
fn layout(rows: &[RowCells<'_>]) -> Vec<Vec<String>> {
    // Per column: text carried down by a rowspan and rows still to cover.
    let mut carried: Vec<Option<(String, usize)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out: Vec<String> = Vec::new();
        let mut cells = row.cells.iter();

        loop {
            let col = out.len();
            if let Some(Some((text, remaining))) = carried.get_mut(col) {
                out.push(text.clone());
                *remaining -= 1;
                if *remaining == 0 {
                    carried[col] = None;
                }
                continue;
            }

            let Some(&cell) = cells.next() else {
                let pending = carried.iter().skip(col).any(Option::is_some);
                if !pending {
                    break;
                }
                out.push(String::new());
                continue;
            };

            let text = cell_text(cell);
            let colspan = span_attr(cell, "colspan", MAX_COLSPAN);
            let rowspan = span_attr(cell, "rowspan", MAX_ROWSPAN);
            for _ in 0..colspan {
                let slot = out.len();
                // An overlapping colspan ends the rowspan carried in this slot.
                if let Some(pending) = carried.get_mut(slot) {
                    *pending = None;
                }
                if rowspan > 1 {
                    if carried.len() <= slot {
                        carried.resize(slot + 1, None);
                    }
                    carried[slot] = Some((text.clone(), rowspan - 1));
                }
                out.push(text.clone());
            }
        }

        grid.push(out);
    }

    grid
}

fn read_table(table: ElementRef<'_>) -> TabularData {
    let rows = direct_rows(table);
    let grid = layout(&rows);

    let mut header_count = rows.iter().take_while(|r| r.in_head).count();
    if header_count == 0 {
        let first_all_th = rows.first().is_some_and(|r| {
            !r.cells.is_empty() && r.cells.iter().all(|c| c.value().name() == "th")
        });
        header_count = usize::from(first_all_th);
    }

    let (header, body) = grid.split_at(header_count);
    let columns = header_labels(header);
    log::debug!(
        "Read table with {} header rows, {} body rows",
        header.len(),
        body.len()
    );
    TabularData::new(columns, body.to_vec())
}

/// Column labels from header rows; stacked header cells are joined by a space.
fn header_labels(header: &[Vec<String>]) -> Vec<String> {
    let width = header.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in header {
                if let Some(text) = row.get(col).map(String::as_str) {
                    if !text.is_empty() && parts.last() != Some(&text) {
                        parts.push(text);
                    }
                }
            }
            if parts.is_empty() {
                col.to_string()
            } else {
                parts.join(" ")
            }
        })
        .collect()
}
