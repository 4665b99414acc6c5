//! Locating the recipient address column.

use crate::error::{MailsiftError, Result};

/// The only column name recognized as holding recipient addresses.
pub const ADDRESS_COLUMN: &str = "email";

/// Lowercase and trim every header cell for matching.
pub fn normalize_header(header: &[String]) -> Vec<String> {
    header.iter().map(|h| h.trim().to_lowercase()).collect()
}

/// Zero-based index of the first column named exactly "email".
///
/// The header is normalized before matching, so passing an already
/// normalized header is fine. No alternate spellings are recognized.
pub fn locate_address_column(header: &[String]) -> Result<usize> {
    let normalized = normalize_header(header);
    normalized
        .iter()
        .position(|h| h == ADDRESS_COLUMN)
        .ok_or(MailsiftError::MissingColumn {
            headers: normalized,
        })
}
