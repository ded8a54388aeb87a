//! Unified error types for scandiff.
//!
//! Structural failures (unreadable files, malformed XML, bad output
//! selections) surface through [`ScanDiffError`]. Per-field problems inside
//! an otherwise well-formed report are *not* errors — the parser recovers
//! from those with defaults and warnings (see [`crate::parsers`]).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scandiff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanDiffError {
    /// Errors during scan report parsing
    #[error("Failed to parse scan report: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors during report rendering
    #[error("Report rendering failed: {context}")]
    Render {
        context: String,
        #[source]
        source: RenderErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Not a scan report - no recognized root element")]
    UnknownFormat,
}

/// Specific render error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderErrorKind {
    #[error("XML writer error: {0}")]
    XmlWriter(String),

    #[error("Output format not supported for this operation: {0}")]
    UnsupportedFormat(String),
}

/// Convenient Result type for scandiff operations
pub type Result<T> = std::result::Result<T, ScanDiffError>;

impl ScanDiffError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a render error with context
    pub fn render(context: impl Into<String>, source: RenderErrorKind) -> Self {
        Self::Render {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for ScanDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<quick_xml::Error> for ScanDiffError {
    fn from(err: quick_xml::Error) -> Self {
        Self::parse(
            "XML deserialization",
            ParseErrorKind::InvalidXml(err.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScanDiffError::parse("at line 3", ParseErrorKind::UnknownFormat);
        let display = err.to_string();
        assert!(
            display.contains("parse") && display.contains("at line 3"),
            "Error message should mention parsing and its context: {}",
            display
        );
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ScanDiffError::io("/path/to/scan.xml", io_err);

        assert!(err.to_string().contains("/path/to/scan.xml"));
    }

    #[test]
    fn test_config_error() {
        let err = ScanDiffError::config("contradictory output format options");
        assert!(err.to_string().contains("contradictory"));
    }
}
