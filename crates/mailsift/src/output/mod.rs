//! Serialization of filtered tables.

mod delimited;
mod table;
mod xlsx;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MailsiftError, Result};

pub use delimited::CsvWriter;
pub use table::OutputTable;
pub use xlsx::{DEFAULT_SHEET_NAME, XlsxWriter};

/// MIME type of XLSX workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Output format of a filtered table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single-sheet workbook, every cell as text.
    #[default]
    Xlsx,
    /// Comma-delimited text.
    Csv,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    /// MIME type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => XLSX_CONTENT_TYPE,
            OutputFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    /// Serialize a table in this format.
    pub fn write(&self, table: &OutputTable, sheet_name: &str) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Xlsx => XlsxWriter::new(sheet_name).generate(table),
            OutputFormat::Csv => CsvWriter::new().generate(table),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = MailsiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(MailsiftError::UnsupportedFormat(format!(
                "Unknown output format: {}. Use xlsx or csv.",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
