//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The AJAX response is not a JSON array of commands.
    #[display("malformed command payload")]
    MalformedPayload,
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// Details about the parsing failure.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The upstream site may serve a half-rendered response while it is
        // being updated, so a broken payload is worth fetching again.
        matches!(self, Self::MalformedPayload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::MalformedPayload.to_string(), "malformed command payload");
        assert_eq!(
            ErrorKind::ParseError { field: "published", value: "yesterday".to_string() }.to_string(),
            "failed to parse field 'published', found value: yesterday"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::MalformedPayload.is_retryable());
        assert!(!ErrorKind::ParseError { field: "published", value: String::new() }.is_retryable());
    }
}
