//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use mailsift::OutputFormat;

/// Mailsift: re-target a mailing list without re-mailing anyone
#[derive(Parser)]
#[command(name = "mailsift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a mailing list, dropping duplicates and already-contacted rows
    Filter {
        /// Path to the mailing list (CSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_filtered.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "xlsx")]
        format: OutputFormat,

        #[command(flatten)]
        oracle: OracleArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the header and first rows of a file
    Preview {
        /// Path to the file (CSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of data rows to show
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP upload service
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Origin allowed to call the API from a browser
        #[arg(long, default_value = "http://localhost:5173")]
        allow_origin: String,

        #[command(flatten)]
        oracle: OracleArgs,
    },
}

/// Sent-mail oracle selection shared by `filter` and `serve`.
#[derive(Args, Clone, Debug)]
pub struct OracleArgs {
    /// Oracle used to check whether an address was already mailed
    #[arg(long, default_value = "gmail")]
    pub oracle: OracleChoice,

    /// File of already-contacted addresses, one per line (mock oracle)
    #[arg(long, value_name = "FILE")]
    pub sent_list: Option<PathBuf>,
}

/// Sent-mail oracle choice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OracleChoice {
    /// Gmail API sent folder (requires MAILSIFT_GMAIL_TOKEN)
    #[default]
    Gmail,
    /// Static list of addresses, for testing and offline runs
    Mock,
}

impl std::str::FromStr for OracleChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gmail" | "google" => Ok(OracleChoice::Gmail),
            "mock" | "static" | "test" => Ok(OracleChoice::Mock),
            _ => Err(format!("Unknown oracle: {}. Use: gmail or mock.", s)),
        }
    }
}

impl std::fmt::Display for OracleChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleChoice::Gmail => write!(f, "gmail"),
            OracleChoice::Mock => write!(f, "mock"),
        }
    }
}
