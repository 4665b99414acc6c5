//! Main Mailsift struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MailsiftError, Result};
use crate::filter::{CancelFlag, DeduplicatingFilter, FilterStats};
use crate::input::{
    InputKind, ReaderConfig, Row, SourceMetadata, TabularReader, locate_address_column,
};
use crate::oracle::SentOracle;
use crate::output::{DEFAULT_SHEET_NAME, OutputFormat, OutputTable};

/// Configuration for a Mailsift pipeline.
#[derive(Debug, Clone)]
pub struct MailsiftConfig {
    /// Reader configuration for delimited input.
    pub reader: ReaderConfig,
    /// Name of the single output sheet.
    pub sheet_name: String,
    /// Output format for [`Mailsift::render`].
    pub output_format: OutputFormat,
    /// Default number of rows returned by previews.
    pub preview_rows: usize,
}

impl Default for MailsiftConfig {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            output_format: OutputFormat::Xlsx,
            preview_rows: 100,
        }
    }
}

/// Result of filtering one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Zero-based index of the address column.
    pub address_column: usize,
    /// Header plus kept rows.
    pub table: OutputTable,
    /// Per-decision counters.
    pub stats: FilterStats,
}

/// First rows of a file, read without consulting the oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preview {
    /// Header cells, verbatim.
    pub headers: Row,
    /// Up to the requested number of data rows.
    pub rows: Vec<Row>,
    /// Whether more rows follow.
    pub truncated: bool,
}

/// The mailing-list filter pipeline.
///
/// Holds a reusable oracle handle; every call to a `filter_*` method is an
/// independent run with its own seen-set and output table.
pub struct Mailsift {
    config: MailsiftConfig,
    reader: TabularReader,
    oracle: Arc<dyn SentOracle>,
}

impl Mailsift {
    /// Create a pipeline around an oracle.
    pub fn new(oracle: impl SentOracle + 'static) -> Self {
        Self::with_shared_oracle(Arc::new(oracle))
    }

    /// Create a pipeline around an oracle shared with other pipelines.
    pub fn with_shared_oracle(oracle: Arc<dyn SentOracle>) -> Self {
        let config = MailsiftConfig::default();
        Self {
            reader: TabularReader::with_config(config.reader.clone()),
            config,
            oracle,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: MailsiftConfig) -> Self {
        self.reader = TabularReader::with_config(config.reader.clone());
        self.config = config;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &MailsiftConfig {
        &self.config
    }

    /// Name of the configured oracle.
    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Filter a file on disk. The kind is inferred from its extension.
    pub fn filter_file(&self, path: impl AsRef<Path>) -> Result<FilterReport> {
        let path = path.as_ref();
        let kind = InputKind::from_path(path)?;

        let bytes = fs::read(path).map_err(|e| MailsiftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.run(&file_name, kind, &bytes, None)
    }

    /// Filter uploaded bytes. The kind is inferred from `file_name`.
    pub fn filter_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<FilterReport> {
        let kind = InputKind::from_filename(file_name)?;
        self.run(file_name, kind, bytes, None)
    }

    /// Like [`Mailsift::filter_bytes`], stopping early once `cancel` is raised.
    pub fn filter_bytes_with_cancel(
        &self,
        file_name: &str,
        bytes: &[u8],
        cancel: CancelFlag,
    ) -> Result<FilterReport> {
        let kind = InputKind::from_filename(file_name)?;
        self.run(file_name, kind, bytes, Some(cancel))
    }

    /// Filter bytes of an explicitly declared kind.
    pub fn filter_kind(&self, kind: InputKind, bytes: &[u8]) -> Result<FilterReport> {
        self.run("", kind, bytes, None)
    }

    fn run(
        &self,
        file_name: &str,
        kind: InputKind,
        bytes: &[u8],
        cancel: Option<CancelFlag>,
    ) -> Result<FilterReport> {
        let source = SourceMetadata::from_bytes(file_name, kind, bytes);
        info!(file = %source.file, kind = %kind, size_bytes = source.size_bytes, "filtering");

        let tabular = self.reader.read(bytes, kind)?;

        // Resolved before any data row is pulled from the stream.
        let address_column = locate_address_column(&tabular.header)?;

        let mut filter = DeduplicatingFilter::new(self.oracle.as_ref());
        if let Some(cancel) = cancel {
            filter = filter.with_cancel(cancel);
        }
        let outcome = filter.run(tabular.header, tabular.rows, address_column)?;

        Ok(FilterReport {
            source,
            address_column,
            table: outcome.table,
            stats: outcome.stats,
        })
    }

    /// Serialize a report's table in the configured output format.
    pub fn render(&self, report: &FilterReport) -> Result<Vec<u8>> {
        self.render_as(report, self.config.output_format)
    }

    /// Serialize a report's table in a specific format.
    pub fn render_as(&self, report: &FilterReport, format: OutputFormat) -> Result<Vec<u8>> {
        format.write(&report.table, &self.config.sheet_name)
    }

    /// Read the header and up to `limit` rows. No address column is required.
    pub fn preview(&self, kind: InputKind, bytes: &[u8], limit: Option<usize>) -> Result<Preview> {
        let limit = limit.unwrap_or(self.config.preview_rows);
        let tabular = self.reader.read(bytes, kind)?;

        let mut rows = Vec::new();
        let mut truncated = false;
        for row in tabular.rows {
            if rows.len() == limit {
                truncated = true;
                break;
            }
            rows.push(row?);
        }

        Ok(Preview {
            headers: tabular.header,
            rows,
            truncated,
        })
    }
}
