//! Public types for the history API
use serde::{Deserialize, Serialize};

use crate::supabase::StoredConversation;

fn default_limit() -> usize {
    50
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Serialize, Deserialize)]
pub struct HistoryResponse {
    pub conversations: Vec<StoredConversation>,
}
