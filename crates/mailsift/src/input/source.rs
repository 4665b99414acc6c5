//! Input kinds and source metadata.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{MailsiftError, Result};

/// The two tabular formats accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Comma-delimited text (`.csv`).
    Delimited,
    /// Office Open XML workbook (`.xlsx`), first sheet only.
    Spreadsheet,
}

impl InputKind {
    /// Infer the kind from a file name's extension.
    ///
    /// Matching is case-insensitive on the suffix; content is never sniffed.
    pub fn from_filename(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        if lower.ends_with(".csv") {
            Ok(InputKind::Delimited)
        } else if lower.ends_with(".xlsx") {
            Ok(InputKind::Spreadsheet)
        } else if lower.is_empty() {
            Err(MailsiftError::UnsupportedFormat(
                "file name is missing".to_string(),
            ))
        } else {
            Err(MailsiftError::UnsupportedFormat(format!(
                "{} (expected .csv or .xlsx)",
                name
            )))
        }
    }

    /// Infer the kind from a path's file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_filename(&name)
    }

    /// Canonical file extension for this kind, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            InputKind::Delimited => "csv",
            InputKind::Spreadsheet => "xlsx",
        }
    }
}

impl FromStr for InputKind {
    type Err = MailsiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "delimited" => Ok(InputKind::Delimited),
            "xlsx" | "spreadsheet" => Ok(InputKind::Spreadsheet),
            other => Err(MailsiftError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Metadata about the uploaded or opened source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path (may be empty for anonymous byte input).
    pub file: String,
    /// Declared input kind.
    pub kind: InputKind,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// When processing started.
    pub processed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a source from its raw bytes.
    pub fn from_bytes(file: impl Into<String>, kind: InputKind, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);

        Self {
            file: file.into(),
            kind,
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes: bytes.len() as u64,
            processed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(InputKind::from_filename("list.csv").unwrap(), InputKind::Delimited);
        assert_eq!(InputKind::from_filename("LIST.XLSX").unwrap(), InputKind::Spreadsheet);
        assert_eq!(
            InputKind::from_filename("archive.2024.csv").unwrap(),
            InputKind::Delimited
        );
    }

    #[test]
    fn test_kind_rejects_other_extensions() {
        for name in ["list.xls", "list.tsv", "list", "csv", ""] {
            let err = InputKind::from_filename(name).unwrap_err();
            assert!(matches!(err, MailsiftError::UnsupportedFormat(_)), "{}", name);
        }
    }

    #[test]
    fn test_kind_from_path() {
        let path = Path::new("/tmp/exports/contacts.csv");
        assert_eq!(InputKind::from_path(path).unwrap(), InputKind::Delimited);
    }

    #[test]
    fn test_metadata_hash() {
        let meta = SourceMetadata::from_bytes("a.csv", InputKind::Delimited, b"email\n");
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.hash.len(), "sha256:".len() + 64);
        assert_eq!(meta.size_bytes, 6);
        assert_eq!(meta.file, "a.csv");
    }
}
