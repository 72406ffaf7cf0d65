//! The JSON API.
//!
//! | Route               | Purpose                                        |
//! |---------------------|------------------------------------------------|
//! | `GET /`             | Landing page                                   |
//! | `GET /health`       | Liveness                                       |
//! | `GET /documents`    | Cached snapshot, optionally filtered           |
//! | `GET /events`       | Event ID to name mappings                      |
//! | `POST /admin/regen` | Regenerate now; needs the `x-cache-token` header |
//! | `GET /files/{name}` | Downloaded documents                           |

use crate::error::{ApiError, ErrorKind, json_error};
use crate::files::serve_file;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use exn::ResultExt;
use racedocs_cache::{Query as DocumentQuery, Snapshot};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::instrument;

pub const CACHE_TOKEN_HEADER: &str = "x-cache-token";

pub fn router(state: AppState, timeout: Duration) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/documents", get(documents))
        .route("/events", get(events))
        .route("/admin/regen", post(regenerate))
        .route("/files/:name", get(serve_file));
    crate::finish(router, state, timeout)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.pages().api_index().or_raise(|| ErrorKind::Render("api index"))?))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "message": "Race documents API is running" }))
}

/// The cached snapshot. Without one, regenerates first and stamps the result
/// with the current time.
///
/// Unfiltered requests get the snapshot exactly as stored; filtered ones only
/// get displayable documents, newest first.
#[instrument(skip_all)]
async fn documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut snapshot = match state.snapshot().await? {
        Some(snapshot) => snapshot,
        None => {
            tracing::info!("No cache yet, regenerating");
            Snapshot::now(state.regenerate().await?)
        },
    };
    if !query.is_empty() {
        snapshot.data = query.apply(&snapshot.data);
    }
    Ok(Json(snapshot))
}

async fn events(State(state): State<AppState>) -> Result<Json<BTreeMap<u64, String>>, ApiError> {
    Ok(Json(state.catalog()?.event_mappings))
}

#[instrument(skip_all)]
async fn regenerate(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let token = headers.get(CACHE_TOKEN_HEADER).and_then(|value| value.to_str().ok());
    if !state.authorized(token) {
        tracing::warn!(token_present = token.is_some(), "Rejected regeneration request");
        return Ok(json_error(StatusCode::FORBIDDEN, "Forbidden"));
    }
    let data = state.regenerate().await?;
    Ok(Json(serde_json::json!({ "status": 200, "regenerated": data.len() })).into_response())
}
