//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::ChatTurn;

/// Both fields are optional here so that missing values can be
/// reported as a 400 instead of an extractor rejection.
#[derive(Deserialize, Debug, Default)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(rename = "sessionId", alias = "session_id")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Returns `(message, session_id)` when both are present and
    /// non-empty.
    pub fn validate(self) -> Option<(String, String)> {
        match (self.message, self.session_id) {
            (Some(message), Some(session_id)) if !message.is_empty() && !session_id.is_empty() => {
                Some((message, session_id))
            }
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub saved_to_supabase: bool,
    pub message_count: usize,
    pub thread_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatTranscriptResponse {
    pub session_id: String,
    pub messages: Vec<ChatTurn>,
}
