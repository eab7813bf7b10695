//! API routes module

pub mod chat;
pub mod env;
pub mod history;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat routes
        .nest("/chat", chat::router())
        // Persisted transcripts for the history viewer
        .nest("/history", history::router())
        // Configuration diagnostics
        .nest("/check-env", env::router())
}

/// Fallback for methods a route doesn't handle
pub(crate) async fn method_not_allowed() -> crate::api::public::ApiError {
    crate::api::public::ApiError::method_not_allowed()
}
