//! Sent-mail oracle trait and configuration.

use std::time::Duration;

use crate::error::Result;

/// Configuration for mailbox-backed oracles.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of the Gmail REST API.
    pub base_url: String,

    /// Mailbox owner ("me" for the authorized account).
    pub user_id: String,

    /// Search operator prepended to the address (e.g. "in:sent").
    pub query_prefix: String,

    /// Timeout for a single lookup.
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gmail.googleapis.com/gmail/v1".to_string(),
            user_id: "me".to_string(),
            query_prefix: "in:sent".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Answers whether mail has already been sent to an address.
///
/// Implementations must be thread-safe (Send + Sync) so one client can be
/// shared by concurrent runs. Addresses are passed already trimmed and
/// lowercased.
pub trait SentOracle: Send + Sync {
    /// Look up one address.
    ///
    /// # Returns
    /// `true` if at least one sent message to this address exists.
    ///
    /// # Errors
    /// [`MailsiftError::OracleQuery`](crate::MailsiftError::OracleQuery) when
    /// the lookup itself failed. Callers treat that as "not sent".
    fn is_already_sent(&self, address: &str) -> Result<bool>;

    /// Get the name of this oracle (for logging/debugging).
    fn name(&self) -> &str;
}
