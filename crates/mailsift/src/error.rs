//! Error types for the Mailsift library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Mailsift operations.
#[derive(Debug, Error)]
pub enum MailsiftError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input has no rows at all, not even a header.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// No column named "email" after trimming and lowercasing the header.
    #[error("No 'email' column found (headers: {})", headers.join(", "))]
    MissingColumn { headers: Vec<String> },

    /// Input kind is neither delimited text nor a spreadsheet.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A single sent-mail lookup failed.
    #[error("Lookup failed for '{address}': {message}")]
    OracleQuery { address: String, message: String },

    /// The run was cancelled before it finished.
    #[error("Processing cancelled")]
    Cancelled,

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading a spreadsheet workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Error assembling the output workbook archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MailsiftError {
    /// Whether this error aborts a whole run.
    ///
    /// Lookup failures are absorbed per row; everything else ends the run
    /// with no output.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MailsiftError::OracleQuery { .. })
    }

    /// Whether the caller supplied bad input, as opposed to an internal failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MailsiftError::EmptyInput(_)
                | MailsiftError::MissingColumn { .. }
                | MailsiftError::UnsupportedFormat(_)
                | MailsiftError::Csv(_)
                | MailsiftError::Spreadsheet(_)
        )
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MailsiftError::Io { .. } => "io",
            MailsiftError::EmptyInput(_) => "empty_input",
            MailsiftError::MissingColumn { .. } => "missing_column",
            MailsiftError::UnsupportedFormat(_) => "unsupported_format",
            MailsiftError::OracleQuery { .. } => "oracle_query",
            MailsiftError::Cancelled => "cancelled",
            MailsiftError::Csv(_) => "csv",
            MailsiftError::Spreadsheet(_) => "spreadsheet",
            MailsiftError::Archive(_) => "archive",
            MailsiftError::Config(_) => "config",
        }
    }
}

/// Result type alias for Mailsift operations.
pub type Result<T> = std::result::Result<T, MailsiftError>;
