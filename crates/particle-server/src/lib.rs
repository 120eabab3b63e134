// File: src/lib.rs
// Purpose: axum front end forwarding every request into the Particle pipeline

pub mod demo;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use particle::config::Config;
use particle::envelope::error_response;
use particle::{App, RawRequest};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Router sending every method and path to [`App::handle`]
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    State(app): State<Arc<App>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let raw = RawRequest {
        method,
        target,
        headers,
        body,
    };

    // The pipeline is synchronous; keep it off the async workers
    match tokio::task::spawn_blocking(move || app.handle(raw)).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            error!(error = %err, "request task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Apply `PARTICLE_HOST` / `PARTICLE_PORT` overrides. Unparseable ports are
/// ignored.
pub fn apply_env_overrides<F>(config: &mut Config, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = var("PARTICLE_HOST").filter(|h| !h.is_empty()) {
        config.server.host = host;
    }
    if let Some(port) = var("PARTICLE_PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid PARTICLE_PORT"),
        }
    }
}
