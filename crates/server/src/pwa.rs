//! The installable web app: a single page listing every cached document,
//! filtered client side.

use crate::error::{ApiError, ErrorKind};
use crate::files::serve_file;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use exn::ResultExt;
use racedocs_cache::Query;
use racedocs_render::{IndexPage, StaticAssets, manifest};
use std::time::Duration;

pub fn router(state: AppState, timeout: Duration) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/manifest.json", get(web_manifest))
        .route("/service-worker.js", get(service_worker))
        .route("/assets/*path", get(asset))
        .route("/files/:name", get(serve_file));
    crate::finish(router, state, timeout)
}

/// The document browser, or a self-refreshing placeholder while the first
/// snapshot is built in the background.
async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let Some(snapshot) = state.snapshot().await? else {
        if state.regenerate_in_background() {
            tracing::info!("No cache yet, regenerating in the background");
        }
        let page = state.pages().loading().or_raise(|| ErrorKind::Render("loading page"))?;
        return Ok(([(CACHE_CONTROL, "no-store")], Html(page)).into_response());
    };
    let documents = Query::default().apply(&snapshot.data);
    let events = state.event_names();
    let page = IndexPage { documents: &documents, events: &events, updated: snapshot.timestamp };
    let html = state.pages().index(&page).or_raise(|| ErrorKind::Render("index"))?;
    Ok(Html(html).into_response())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "message": "Race documents web app is running" }))
}

async fn web_manifest() -> Response {
    ([(CONTENT_TYPE, "application/manifest+json")], Json(manifest())).into_response()
}

async fn service_worker(State(state): State<AppState>) -> Result<Response, ApiError> {
    let script = state.pages().service_worker().or_raise(|| ErrorKind::Render("service worker"))?;
    Ok(([(CONTENT_TYPE, "application/javascript"), (CACHE_CONTROL, "no-cache")], script).into_response())
}

async fn asset(Path(path): Path<String>) -> Response {
    match StaticAssets::load(&path) {
        Some(asset) => ([(CONTENT_TYPE, asset.mime)], asset.data).into_response(),
        None => crate::error::json_error(StatusCode::NOT_FOUND, "Not Found"),
    }
}
