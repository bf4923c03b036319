//! Tabular data types.

use serde::{Deserialize, Serialize};

/// Row/column data extracted from one table.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabularData {
    /// Column labels
    pub columns: Vec<String>,

    /// Body rows in document order
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Create tabular data from labeled columns and rows.
    ///
    /// Rows shorter than the header are padded with empty cells and the
    /// header is widened with positional labels when a row is longer.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(columns.len()))
            .max()
            .unwrap_or(0);

        let mut columns = columns;
        while columns.len() < width {
            columns.push(columns.len().to_string());
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Create tabular data with positional column labels (`0`, `1`, ...).
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self::new(Vec::new(), rows)
    }

    /// Get the number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row and column position.
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Position of the first column with the given label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// All values of the column with the given label.
    pub fn column(&self, label: &str) -> Option<Vec<&str>> {
        let index = self.column_index(label)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(index).map_or("", String::as_str))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_new() {
        let table = TabularData::default();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_with_data() {
        let table = TabularData::new(
            strings(&["Name", "Index", "Domain"]),
            vec![strings(&["$I$", "", ""]), strings(&["$c$", "$J$", "$\\Re_+$"])],
        );

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.get(1, 2), Some("$\\Re_+$"));
        assert_eq!(table.column("Name"), Some(vec!["$I$", "$c$"]));
        assert_eq!(table.column("Missing"), None);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = TabularData::new(
            strings(&["a"]),
            vec![strings(&["1", "2", "3"]), strings(&["4"])],
        );

        assert_eq!(table.columns, strings(&["a", "1", "2"]));
        assert_eq!(table.rows[1], strings(&["4", "", ""]));
    }

    #[test]
    fn test_positional_columns() {
        let table = TabularData::from_rows(vec![strings(&["x", "y"])]);
        assert_eq!(table.columns, strings(&["0", "1"]));
        assert_eq!(table.column("1"), Some(vec!["y"]));
    }

    #[test]
    fn test_column_of_short_literal_rows() {
        let table = TabularData {
            columns: strings(&["Name", "Domain"]),
            rows: vec![strings(&["x", "{0, 1}"]), strings(&["y"])],
        };
        assert_eq!(table.column("Domain"), Some(vec!["{0, 1}", ""]));
    }
}
