//! Application state for the web server.

use std::sync::Arc;

use mailsift::Mailsift;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The filter pipeline. Each request is an independent run.
    pub mailsift: Arc<Mailsift>,
}

impl AppState {
    /// Create new application state.
    pub fn new(mailsift: Mailsift) -> Self {
        Self {
            mailsift: Arc::new(mailsift),
        }
    }

    /// Name of the configured oracle (for display).
    pub fn oracle_name(&self) -> &str {
        self.mailsift.oracle_name()
    }
}
