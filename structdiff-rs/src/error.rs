//! Error types for the structural diff.

use thiserror::Error;

/// Result type alias for diff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or diffing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Structural XML parsing error (missing root, mismatched tags, ...).
    #[error("XML parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
