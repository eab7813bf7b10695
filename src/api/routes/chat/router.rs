//! Router for the chat API

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::method_not_allowed;
use crate::api::state::SharedState;
use crate::chat::converse;

/// Send a message and wait for the assistant's reply
async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::ChatRequest>, JsonRejection>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::warn!("Rejected chat request body: {}", rejection.body_text());
            public::ChatRequest::default()
        }
    };
    let Some((message, session_id)) = payload.validate() else {
        return Err(ApiError::bad_request("Missing message or sessionId"));
    };

    tracing::debug!("Received message for session {}", session_id);

    let reply = converse(&state, &session_id, &message)
        .await
        .map_err(|e| ApiError::from_assistant(&e, state.config.locale, state.config.run_mode))?;

    Ok(Json(public::ChatResponse {
        response: reply.reply,
        saved_to_supabase: reply.persisted,
        message_count: reply.turn_count,
        thread_id: reply.thread_id,
    }))
}

/// Bare preflight requests get an empty 200
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Get the in-memory transcript of a session
async fn chat_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<public::ChatTranscriptResponse>, ApiError> {
    let Some(messages) = state.sessions.transcript(&session_id).await else {
        return Err(ApiError::not_found(&format!(
            "Chat session {} not found",
            session_id
        )));
    };

    Ok(Json(public::ChatTranscriptResponse {
        session_id,
        messages,
    }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/",
            post(chat_handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/{session_id}", get(chat_session))
}
