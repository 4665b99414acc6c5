//! Gmail sent-mail search oracle.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{MailsiftError, Result};

use super::provider::{OracleConfig, SentOracle};

/// Environment variable holding an OAuth access token with
/// `gmail.readonly` scope.
pub const TOKEN_ENV_VAR: &str = "MAILSIFT_GMAIL_TOKEN";

/// Oracle backed by a Gmail mailbox search over sent messages.
///
/// Token acquisition and refresh happen outside this type; it only
/// attaches the bearer token it was given.
pub struct GmailOracle {
    client: Client,
    access_token: String,
    config: OracleConfig,
}

#[derive(Debug, Deserialize)]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    #[allow(dead_code)]
    id: String,
}

impl GmailOracle {
    /// Create an oracle with the given access token.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(access_token, OracleConfig::default())
    }

    /// Create an oracle with custom configuration.
    pub fn with_config(access_token: impl Into<String>, config: OracleConfig) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(MailsiftError::Config("Gmail access token is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailsiftError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token,
            config,
        })
    }

    /// Create from the [`TOKEN_ENV_VAR`] environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR).map_err(|_| {
            MailsiftError::Config(format!("{} environment variable not set", TOKEN_ENV_VAR))
        })?;
        Self::new(token)
    }

    /// Search query for one address.
    fn search_query(&self, address: &str) -> String {
        format!("{} {}", self.config.query_prefix, address)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/users/{}/messages",
            self.config.base_url.trim_end_matches('/'),
            self.config.user_id
        )
    }

    fn query_error(address: &str, message: impl Into<String>) -> MailsiftError {
        MailsiftError::OracleQuery {
            address: address.to_string(),
            message: message.into(),
        }
    }
}

impl SentOracle for GmailOracle {
    fn is_already_sent(&self, address: &str) -> Result<bool> {
        let query = self.search_query(address);

        let response = self
            .client
            .get(self.messages_url())
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("maxResults", "1")])
            .send()
            .map_err(|e| Self::query_error(address, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(Self::query_error(
                address,
                format!("API error ({}): {}", status, error_text),
            ));
        }

        let listing: ListMessagesResponse = response
            .json()
            .map_err(|e| Self::query_error(address, format!("invalid response: {}", e)))?;

        Ok(!listing.messages.is_empty())
    }

    fn name(&self) -> &str {
        "gmail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_rejected() {
        let err = GmailOracle::new("  ").err().unwrap();
        assert!(matches!(err, MailsiftError::Config(_)));
    }

    #[test]
    fn test_search_query_and_url() {
        let config = OracleConfig {
            base_url: "http://localhost:9999/gmail/v1/".to_string(),
            ..OracleConfig::default()
        };
        let oracle = GmailOracle::with_config("token", config).unwrap();

        assert_eq!(oracle.search_query("a@x.com"), "in:sent a@x.com");
        assert_eq!(
            oracle.messages_url(),
            "http://localhost:9999/gmail/v1/users/me/messages"
        );
    }

    #[test]
    fn test_unreachable_server_is_query_error() {
        let config = OracleConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..OracleConfig::default()
        };
        let oracle = GmailOracle::with_config("token", config).unwrap();

        let err = oracle.is_already_sent("a@x.com").unwrap_err();
        assert!(matches!(err, MailsiftError::OracleQuery { ref address, .. } if address == "a@x.com"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_response_parsing() {
        let empty: ListMessagesResponse = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(empty.messages.is_empty());

        let found: ListMessagesResponse = serde_json::from_str(
            r#"{"messages": [{"id": "18c", "threadId": "18c"}], "resultSizeEstimate": 1}"#,
        )
        .unwrap();
        assert_eq!(found.messages.len(), 1);
    }
}
