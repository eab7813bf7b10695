//! One user message in, one assistant reply out.

use serde::Serialize;

use super::models::ChatTurn;
use crate::api::AppState;
use crate::openai::{AssistantError, Exchange};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub reply: String,
    pub persisted: bool,
    pub turn_count: usize,
    pub thread_id: String,
}

/// Record `message` in the session, ask the assistant for a reply,
/// record the reply and save the transcript.
///
/// The session stays locked for the whole exchange, so a user turn is
/// always directly followed by the reply it produced. When the
/// exchange fails the user turn is kept and no assistant turn is
/// added. Persistence is best effort and only affects
/// `Reply::persisted`.
pub async fn converse(
    state: &AppState,
    session_id: &str,
    message: &str,
) -> Result<Reply, AssistantError> {
    let mut session = state.sessions.lock(session_id).await;
    session.push(ChatTurn::user(message));

    let Exchange { thread_id, reply } = match state.assistant.exchange(message).await {
        Ok(exchange) => exchange,
        Err(e) => {
            tracing::error!(
                "Chat exchange failed for session {} at stage {}: {}",
                session_id,
                e.stage(),
                e
            );
            return Err(e);
        }
    };

    let turn_count = session.push(ChatTurn::assistant(&reply));
    let persisted = state.transcripts.persist(session_id, session.turns()).await;

    Ok(Reply {
        reply,
        persisted,
        turn_count,
        thread_id,
    })
}
