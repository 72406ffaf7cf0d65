//! HTTP surfaces over the document cache.
//!
//! Two routers share one [`AppState`]: the JSON [`api`] and the installable
//! web app ([`pwa`]). Either can run on its own, each on its own port.

pub mod api;
pub mod error;
mod files;
pub mod pwa;
mod schedule;
mod state;

use crate::error::{ErrorKind, Result, json_error};
use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use exn::ResultExt;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use crate::schedule::spawn_schedule;
pub use crate::state::AppState;

/// Bind `address` and serve `router` until `shutdown` resolves.
pub async fn serve(
    address: &str,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(address).await.or_raise(|| ErrorKind::Bind(address.to_string()))?;
    tracing::info!(address, "Listening");
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await.or_raise(|| ErrorKind::Serve)
}

/// Middleware and fallback shared by both routers.
fn finish(router: Router<AppState>, state: AppState, timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new());
    router.fallback(not_found).layer(middleware).with_state(state)
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}
