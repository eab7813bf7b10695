//! Router for the history API

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::method_not_allowed;
use crate::api::state::SharedState;

const MAX_LIMIT: usize = 500;

/// List persisted transcripts, newest first
async fn history_list(
    State(state): State<SharedState>,
    Query(params): Query<public::HistoryQuery>,
) -> Result<Json<public::HistoryResponse>, ApiError> {
    let Some(client) = state.transcripts.client() else {
        tracing::warn!("Supabase is not configured, returning empty history");
        return Ok(Json(public::HistoryResponse {
            conversations: vec![],
        }));
    };

    let limit = params.limit.clamp(1, MAX_LIMIT);
    let conversations = client
        .list_conversations(limit)
        .await
        .map_err(|e| ApiError::internal(&e, state.config.locale, state.config.run_mode))?;

    Ok(Json(public::HistoryResponse { conversations }))
}

/// Create the history router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(history_list).fallback(method_not_allowed))
}
