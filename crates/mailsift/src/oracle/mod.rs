//! Sent-mail oracles: "has this address already been mailed?"
//!
//! The filter depends only on the [`SentOracle`] trait. Concrete oracles are
//! injected by the caller, so several runs can share one client or each use
//! their own.
//!
//! # Supported Oracles
//!
//! - **Gmail** - search over the account's sent mail (requires `MAILSIFT_GMAIL_TOKEN`)
//! - **Static** - fixed in-memory list, for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use mailsift::{GmailOracle, Mailsift};
//!
//! let mailsift = Mailsift::new(GmailOracle::from_env().unwrap());
//! ```

mod gmail;
mod mock;
mod provider;

pub use gmail::{GmailOracle, TOKEN_ENV_VAR};
pub use mock::StaticOracle;
pub use provider::{OracleConfig, SentOracle};
