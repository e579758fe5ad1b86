//! Error types for datacat operations.
//!
//! This module defines [`DatacatError`], the single error type returned by
//! fetching, parsing and record assembly.
//!
//! Scanners never surface errors: a broken linked-data block or a bad
//! attribute value simply contributes nothing. Only the assembler fails a
//! whole conversion, and only when it cannot build a structurally valid record.
//!
//! # Example
//!
//! ```rust
//! use datacat_core::{DatacatError, Result};
//!
//! fn require_title(title: Option<&str>) -> Result<&str> {
//!     title.ok_or_else(|| DatacatError::Assembly("missing title".to_string()))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for datacat operations.
#[derive(Error, Debug)]
pub enum DatacatError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, connection issues and other
    /// HTTP-related problems raised while fetching a page.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// The assembler could not combine its inputs into a valid record.
    ///
    /// Raised for structural problems such as a non-string value where text
    /// was required, or a raw scrape carrying more than one metadata mapping.
    /// Nothing is partially applied when this is returned.
    #[error("DCAT assembly failed: {0}")]
    Assembly(String),

    /// A configuration value that would make the scanners match nothing or everything.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DatacatError {
    fn from(err: serde_json::Error) -> Self {
        DatacatError::Serialization(err.to_string())
    }
}

/// Result type alias for DatacatError.
pub type Result<T> = std::result::Result<T, DatacatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatacatError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_assembly_error() {
        let err = DatacatError::Assembly("field `Title` must be a string".to_string());
        assert!(err.to_string().starts_with("DCAT assembly failed"));
        assert!(err.to_string().contains("Title"));
    }

    #[test]
    fn test_timeout_error() {
        let err = DatacatError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let err: DatacatError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, DatacatError::Serialization(_)));
    }
}
