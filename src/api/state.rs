use std::sync::Arc;

use anyhow::Result;

use crate::chat::SessionStore;
use crate::core::AppConfig;
use crate::openai::AssistantClient;
use crate::supabase::{SupabaseClient, TranscriptPersister};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AppConfig,
    // Transcripts of every session seen since the process started
    pub sessions: SessionStore,
    pub assistant: AssistantClient,
    pub transcripts: TranscriptPersister,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let assistant = AssistantClient::from_config(&config)?;
        let transcripts = TranscriptPersister::new(SupabaseClient::from_config(&config)?);
        Ok(Self {
            config,
            sessions: SessionStore::new(),
            assistant,
            transcripts,
        })
    }
}
