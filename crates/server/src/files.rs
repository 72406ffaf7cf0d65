//! `GET /files/{name}`: downloaded documents.

use crate::error::{ApiError, ErrorKind, json_error};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use racedocs_storage::error::ErrorKind as StorageErrorKind;

pub(crate) async fn serve_file(State(state): State<AppState>, Path(name): Path<String>) -> Result<Response, ApiError> {
    let Some(files) = state.files() else {
        return Ok(json_error(StatusCode::NOT_FOUND, "Not Found"));
    };
    match files.read(std::path::Path::new(&name)).await {
        Ok(data) => Ok((
            [(CONTENT_TYPE, "application/pdf"), (CACHE_CONTROL, "public, max-age=86400")],
            data,
        )
            .into_response()),
        Err(e) => match &*e {
            StorageErrorKind::NotFound(_) | StorageErrorKind::FilteredPath(_) | StorageErrorKind::InvalidPath(_) => {
                tracing::debug!(name, "No such document");
                Ok(json_error(StatusCode::NOT_FOUND, "Not Found"))
            },
            _ => Err(e.raise(ErrorKind::Storage).into()),
        },
    }
}
