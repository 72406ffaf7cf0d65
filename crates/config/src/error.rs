//! Config Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Settings sources could not be merged or deserialized.
    #[display("could not load settings")]
    Load,
    /// An explicitly requested settings file does not exist.
    #[display("settings file not found: {}", _0.display())]
    SettingsNotFound(#[error(not(source))] PathBuf),
    /// Settings were loaded but a value is unusable.
    #[display("invalid setting `{field}`: {reason}")]
    Invalid {
        #[error(not(source))]
        field: &'static str,
        #[error(not(source))]
        reason: String,
    },
    /// The event catalog could not be read or written.
    #[display("event catalog unavailable: {}", _0.display())]
    CatalogIo(#[error(not(source))] PathBuf),
    /// The event catalog exists but is not valid catalog JSON.
    #[display("malformed event catalog: {}", _0.display())]
    CatalogFormat(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CatalogIo(_))
    }
}
