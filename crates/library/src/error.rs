//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not build HTTP client")]
    Client,
    /// No response was received (connection, timeout, body read).
    #[display("request failed: {_0}")]
    Request(#[error(not(source))] String),
    /// A response was received, but not a successful one.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    #[display("could not extract documents from response")]
    Extract,
    #[display("event catalog unavailable")]
    Catalog,
    #[display("document cache unavailable")]
    Cache,
    #[display("could not store download: {_0}")]
    Storage(#[error(not(source))] String),
    #[display("could not read season page")]
    SeasonPage,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) | Self::Storage(_) => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
