//! CSV export of filtered tables.

use crate::error::{MailsiftError, Result};

use super::table::OutputTable;

/// Writes a filtered table as comma-delimited text.
#[derive(Debug, Clone, Default)]
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the header and rows. Ragged rows keep their own width.
    pub fn generate(&self, table: &OutputTable) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in table.all_rows() {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| MailsiftError::Io {
                path: "<memory>".into(),
                source: e.into_error(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_output() {
        let mut table = OutputTable::new(vec!["email".to_string(), "name".to_string()]);
        table.push(vec!["b@y.com".to_string(), "Bob".to_string()]);
        table.push(vec!["c@z.com".to_string(), "Doe, Carol".to_string()]);

        let bytes = CsvWriter::new().generate(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "email,name\nb@y.com,Bob\nc@z.com,\"Doe, Carol\"\n"
        );
    }

    #[test]
    fn test_header_only() {
        let table = OutputTable::new(vec!["Email".to_string()]);
        let bytes = CsvWriter::new().generate(&table).unwrap();
        assert_eq!(bytes, b"Email\n");
    }
}
