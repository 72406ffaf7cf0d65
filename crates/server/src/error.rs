//! Server Error Types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};

/// A server error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The listening socket couldn't be opened
    #[display("unable to listen on {_0}")]
    Bind(#[error(not(source))] String),
    /// The server stopped unexpectedly
    #[display("server error")]
    Serve,
    /// A page or script failed to render
    #[display("unable to render {_0}")]
    Render(#[error(not(source))] &'static str),
    /// The event catalog couldn't be read
    #[display("unable to read the event catalog")]
    Catalog,
    /// The cache snapshot couldn't be read
    #[display("unable to read the cache")]
    Cache,
    /// A downloaded document couldn't be read
    #[display("unable to read document")]
    Storage,
    /// The regeneration task died before finishing
    #[display("regeneration task failed")]
    Regeneration,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cache | Self::Storage | Self::Regeneration)
    }
}

/// Handler error; logged in full, answered with a generic 500.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, retryable = self.0.is_retryable(), "Request failed");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

/// `{"error": message, "status": code}` with a matching status line.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message, "status": status.as_u16() }))).into_response()
}
