use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::api::state::{AppState, SharedState};
use crate::core::AppConfig;
use crate::jobs::{EvictIdleSessions, spawn_periodic_job};

// axum logs rejections from built-in extractors with the
// `axum::rejection` target, at `TRACE` level
pub const LOG_FILTER: &str = concat!(
    env!("CARGO_CRATE_NAME"),
    "=debug,tower_http=debug,axum::rejection=trace"
);

pub fn app(shared_state: SharedState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

// Run the server. Expects logging to be initialized already.
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    let shared_state = Arc::new(AppState::new(config)?);
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    // Sessions live in memory only, sweep the idle ones periodically
    spawn_periodic_job(shared_state, EvictIdleSessions);

    axum::serve(listener, app).await?;

    Ok(())
}
