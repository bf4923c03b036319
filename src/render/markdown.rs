//! Markdown rendering for table collections.

use crate::model::{TableCollection, TabularData};

/// Convert a collection to Markdown: one heading and pipe table per entry.
pub fn to_markdown(collection: &TableCollection) -> String {
    let mut output = String::new();

    for (id, table) in collection.iter() {
        output.push_str(&format!("## {}\n\n", escape_markdown(id)));
        render_table_markdown(&mut output, table);
    }

    output.trim_end().to_string() + "\n"
}

fn render_table_markdown(output: &mut String, table: &TabularData) {
    if table.column_count() == 0 {
        output.push_str("_(empty table)_\n\n");
        return;
    }

    render_row(output, &table.columns);
    output.push('|');
    for _ in &table.columns {
        output.push_str(" --- |");
    }
    output.push('\n');

    for row in &table.rows {
        render_row(output, row);
    }
    output.push('\n');
}

fn render_row(output: &mut String, cells: &[String]) {
    output.push('|');
    for cell in cells {
        output.push_str(&format!(" {} |", escape_cell(cell)));
    }
    output.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '#' | '[' | ']') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
