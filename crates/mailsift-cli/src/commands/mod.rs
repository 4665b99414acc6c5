//! CLI command implementations.

pub mod filter;
pub mod preview;
pub mod serve;

use std::fs;
use std::sync::Arc;

use mailsift::{GmailOracle, SentOracle, StaticOracle};

use crate::cli::{OracleArgs, OracleChoice};

/// Build the oracle selected on the command line.
///
/// Must be called outside any async runtime: the Gmail oracle owns a
/// blocking HTTP client.
pub fn build_oracle(args: &OracleArgs) -> Result<Arc<dyn SentOracle>, Box<dyn std::error::Error>> {
    match args.oracle {
        OracleChoice::Gmail => {
            if args.sent_list.is_some() {
                return Err("--sent-list only applies to --oracle mock".into());
            }
            Ok(Arc::new(GmailOracle::from_env()?))
        }
        OracleChoice::Mock => {
            let oracle = match &args.sent_list {
                Some(path) => {
                    let text = fs::read_to_string(path).map_err(|e| {
                        format!("Failed to read sent list {}: {}", path.display(), e)
                    })?;
                    StaticOracle::from_list(&text)
                }
                None => StaticOracle::new(),
            };
            Ok(Arc::new(oracle))
        }
    }
}
