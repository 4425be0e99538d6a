// ============================================================
// TABLE
// ============================================================
// Parsed CSV content: one header row plus data rows

use serde::{Deserialize, Serialize};

/// A single data row, cells in column order
pub type Row = Vec<String>;

/// Parsed CSV content
///
/// Rows line up with `headers` by position. Nothing enforces equal lengths:
/// a row may be shorter or longer than the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header labels (first line of the file)
    pub headers: Vec<String>,

    /// Data rows in file order
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// True when the file had no content at all
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Number of labelled (sortable) columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Width of the rendered grid: the header count or the longest row,
    /// whichever is larger
    pub fn grid_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.len())
            .max()
            .unwrap_or(0)
            .max(self.headers.len())
    }

    pub fn has_column(&self, column_index: usize) -> bool {
        column_index < self.headers.len()
    }
}
