//! In-memory oracle for testing and offline runs.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::error::{MailsiftError, Result};

use super::provider::SentOracle;

/// Oracle that answers from a fixed set of already-contacted addresses.
///
/// Every lookup is recorded so tests can assert how often, and in which
/// order, each address was queried.
#[derive(Debug, Default)]
pub struct StaticOracle {
    sent: HashSet<String>,
    failing: HashSet<String>,
    queries: Mutex<Vec<String>>,
}

impl StaticOracle {
    /// Create an oracle that reports nothing as sent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an oracle from a list of sent addresses.
    pub fn with_sent<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut oracle = Self::new();
        for address in addresses {
            oracle.add_sent(address.as_ref());
        }
        oracle
    }

    /// Parse a sent list: one address per line, blank lines and `#` comments ignored.
    pub fn from_list(text: &str) -> Self {
        Self::with_sent(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Mark an address as already sent.
    pub fn add_sent(&mut self, address: &str) {
        self.sent.insert(normalize(address));
    }

    /// Make lookups for this address fail.
    pub fn fail_on(mut self, address: &str) -> Self {
        self.failing.insert(normalize(address));
        self
    }

    /// Number of addresses known as sent.
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    /// Addresses queried so far, in query order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times an address was queried.
    pub fn query_count(&self, address: &str) -> usize {
        let address = normalize(address);
        self.queries().iter().filter(|q| **q == address).count()
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

impl SentOracle for StaticOracle {
    fn is_already_sent(&self, address: &str) -> Result<bool> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(address.to_string());

        let key = normalize(address);
        if self.failing.contains(&key) {
            return Err(MailsiftError::OracleQuery {
                address: address.to_string(),
                message: "simulated lookup failure".to_string(),
            });
        }

        Ok(self.sent.contains(&key))
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_normalized() {
        let oracle = StaticOracle::with_sent(["A@X.com "]);
        assert!(oracle.is_already_sent("a@x.com").unwrap());
        assert!(!oracle.is_already_sent("b@y.com").unwrap());
    }

    #[test]
    fn test_from_list_skips_comments() {
        let oracle = StaticOracle::from_list("# exported 2024-05\na@x.com\n\n  b@y.com  \n");
        assert_eq!(oracle.sent_count(), 2);
        assert!(oracle.is_already_sent("b@y.com").unwrap());
    }

    #[test]
    fn test_failure_and_query_log() {
        let oracle = StaticOracle::new().fail_on("b@y.com");
        assert!(oracle.is_already_sent("b@y.com").is_err());
        assert!(!oracle.is_already_sent("c@z.com").unwrap());

        assert_eq!(oracle.queries(), vec!["b@y.com", "c@z.com"]);
        assert_eq!(oracle.query_count("B@Y.COM"), 1);
    }

    #[test]
    fn test_query_log_survives_poisoned_lock() {
        let oracle = StaticOracle::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = oracle.queries.lock().unwrap();
            panic!("poison the query log");
        }));
        assert!(oracle.queries.is_poisoned());

        assert!(!oracle.is_already_sent("a@x.com").unwrap());
        assert_eq!(oracle.queries(), vec!["a@x.com"]);
    }
}
