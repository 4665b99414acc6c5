//! Mailsift: re-target a mailing list while skipping already-contacted recipients.
//!
//! Mailsift reads a CSV or XLSX file with an `email` column, asks a sent-mail
//! oracle about each distinct address, and writes a new workbook holding the
//! header plus every row whose address has not been mailed yet.
//!
//! # Core Principles
//!
//! - **First occurrence decides**: each distinct address is looked up once;
//!   later rows with the same address are dropped
//! - **Non-destructive**: kept rows are written exactly as they were read
//! - **Available over precise**: a failed lookup keeps the row
//!
//! # Example
//!
//! ```no_run
//! use mailsift::{Mailsift, StaticOracle};
//!
//! let mailsift = Mailsift::new(StaticOracle::with_sent(["alice@example.com"]));
//! let report = mailsift.filter_file("contacts.csv").unwrap();
//!
//! println!("Kept: {}", report.stats.kept);
//! std::fs::write("filtered_output.xlsx", mailsift.render(&report).unwrap()).unwrap();
//! ```

pub mod error;
pub mod filter;
pub mod input;
pub mod oracle;
pub mod output;

mod mailsift;

pub use crate::mailsift::{FilterReport, Mailsift, MailsiftConfig, Preview};
pub use error::{MailsiftError, Result};
pub use filter::{CancelFlag, DeduplicatingFilter, FilterStats, RowDecision, normalize_address};
pub use input::{InputKind, SourceMetadata, TabularReader, TabularSource};
pub use oracle::{GmailOracle, OracleConfig, SentOracle, StaticOracle};
pub use output::{CsvWriter, OutputFormat, OutputTable, XlsxWriter};
