//! The in-memory table the engine operates on.

use serde::{Deserialize, Serialize};

/// A table of string-valued records.
///
/// Cells are plain strings; an empty or whitespace-only cell is the missing
/// state. Strings like `"N/A"` are deliberately *not* treated as missing:
/// they are present-but-unparseable values and classify as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new table. Short rows are padded with empty cells and long
    /// rows truncated so every row matches the header length.
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { headers, rows }
    }

    /// Build a table from named columns, all of which must share a length.
    /// Column order is preserved.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut headers = Vec::new();
        let mut cols: Vec<Vec<String>> = Vec::new();
        for (name, values) in columns {
            headers.push(name.into());
            cols.push(values);
        }

        let height = cols.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = vec![Vec::with_capacity(headers.len()); height];
        for col in &mut cols {
            col.resize(height, String::new());
        }
        for (i, row) in rows.iter_mut().enumerate() {
            for col in &cols {
                row.push(col[i].clone());
            }
        }

        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get all values for a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Whether a cell value is missing (empty or whitespace-only).
    pub fn is_blank(value: &str) -> bool {
        value.trim().is_empty()
    }
}
