//! Render Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Asset was not embedded in the binary.
    #[display("asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// Template failed to compile or render.
    #[display("template error: {_0}")]
    Template(#[error(not(source))] &'static str),
    #[display("could not serialize page data")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
