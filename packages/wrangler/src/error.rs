//! Error types for the wrangler.
//!
//! A single `WranglerError` covers every tool. The three domain variants
//! (`FileNotFound`, `MalformedRecord`, `Encoding`) carry enough context to
//! point at the offending file, row or element; everything else wraps the
//! underlying library error.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the wrangler library.
#[derive(Debug, Error)]
pub enum WranglerError {
    /// Input file does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A record, row or element lacks an expected field or attribute.
    #[error("Malformed record in {context}: {detail}")]
    MalformedRecord { context: String, detail: String },

    /// Bytes that must be UTF-8 are not.
    #[error("Invalid UTF-8 in {context}")]
    Encoding { context: String },

    /// Verification found street names that should have been corrected.
    #[error("{0} stale street name(s) remain")]
    StaleStreetNames(usize),

    /// Correction table is unusable.
    #[error("Invalid correction table: {0}")]
    InvalidCorrectionTable(String),

    /// XML parsing (DOM) failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// XML streaming failed.
    #[error("XML stream error: {0}")]
    XmlStream(#[from] quick_xml::Error),

    /// XML streaming failed while reading at a known offset.
    #[error("XML stream error at byte {position}: {source}")]
    XmlStreamAt {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A CSV row could not be inserted.
    #[error("Failed to insert {table} row from line {line}: {source}")]
    Insert {
        table: String,
        line: u64,
        #[source]
        source: rusqlite::Error,
    },

    /// Correction file could not be deserialized.
    #[error("Failed to read correction file: {0}")]
    CorrectionFile(#[from] serde_yaml_ng::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WranglerError {
    /// Build a `MalformedRecord` error.
    pub fn malformed(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// Build an `Encoding` error.
    pub fn encoding(context: impl Into<String>) -> Self {
        Self::Encoding {
            context: context.into(),
        }
    }

    /// Classify a CSV error, surfacing UTF-8 failures as `Encoding` and
    /// row shape failures as `MalformedRecord`.
    pub fn from_csv(err: csv::Error, source: &str) -> Self {
        let at = |pos: &Option<csv::Position>| {
            let line = pos
                .as_ref()
                .map(|p| format!(" line {}", p.line()))
                .unwrap_or_default();
            format!("{source}{line}")
        };

        match err.kind() {
            csv::ErrorKind::Utf8 { pos, .. } => Self::encoding(at(pos)),
            csv::ErrorKind::Deserialize { pos, err } => Self::malformed(at(pos), err.to_string()),
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => Self::malformed(
                at(pos),
                format!("expected {expected_len} fields, found {len}"),
            ),
            _ => Self::Csv(err),
        }
    }
}

/// Result type alias for wrangler operations.
pub type Result<T> = std::result::Result<T, WranglerError>;
