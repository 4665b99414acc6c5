//! The filtered table handed to the writers.

use serde::{Deserialize, Serialize};

use crate::input::Row;

/// Header row followed by kept data rows, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTable {
    /// Original header row, verbatim.
    pub header: Row,
    /// Kept data rows, cells unmodified.
    pub rows: Vec<Row>,
}

impl OutputTable {
    /// Start a table with only its header.
    pub fn new(header: Row) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Append a kept row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of data rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when no data rows were kept.
    pub fn is_header_only(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows including the header, header first.
    pub fn all_rows(&self) -> impl Iterator<Item = &Row> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rows_starts_with_header() {
        let mut table = OutputTable::new(vec!["email".to_string()]);
        assert!(table.is_header_only());

        table.push(vec!["a@x.com".to_string()]);
        let rows: Vec<_> = table.all_rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "email");
        assert_eq!(table.row_count(), 1);
    }
}
