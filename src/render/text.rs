//! Plain text rendering for table collections.

use crate::model::{TableCollection, TabularData};

/// Render every table as `*** {index} {identifier}` followed by an aligned grid.
pub fn to_text(collection: &TableCollection) -> String {
    let mut output = String::new();

    for (i, (id, table)) in collection.iter().enumerate() {
        output.push_str(&format!("*** {} {}\n", i, id));
        render_grid(&mut output, table);
        output.push('\n');
    }

    output.trim_end().to_string()
}

fn render_grid(output: &mut String, table: &TabularData) {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let index_width = table.row_count().saturating_sub(1).to_string().len();

    render_line(output, &" ".repeat(index_width), &table.columns, &widths);
    for (i, row) in table.rows.iter().enumerate() {
        let index = format!("{:>width$}", i, width = index_width);
        render_line(output, &index, row, &widths);
    }
}

fn render_line(output: &mut String, index: &str, cells: &[String], widths: &[usize]) {
    let mut line = index.to_string();
    for (cell, &width) in cells.iter().zip(widths) {
        line.push_str("  ");
        line.push_str(cell);
        let pad = width - cell.chars().count();
        line.push_str(&" ".repeat(pad));
    }
    output.push_str(line.trim_end());
    output.push('\n');
}
