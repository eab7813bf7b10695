//! Transcript storage in a Supabase (PostgREST) table.
//!
//! Rows are keyed by `conversation_id` and hold the whole transcript
//! as JSON. Every save overwrites the full transcript so the last
//! write wins.

use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::chat::ChatTurn;
use crate::core::AppConfig;

/// A persisted transcript as listed by the history viewer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredConversation {
    pub id: Value,
    pub conversation_id: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    url: String,
    service_key: String,
    table: String,
}

impl SupabaseClient {
    pub fn new(url: &str, service_key: &str, table: &str, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            table: table.to_string(),
        })
    }

    /// Build a client when the store is configured, `None` otherwise.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        match (&config.supabase_url, &config.supabase_service_role_key) {
            (Some(url), Some(key)) => Ok(Some(Self::new(
                url,
                key,
                &config.supabase_table,
                config.request_timeout,
            )?)),
            _ => Ok(None),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Insert or replace the transcript stored for `session_id`.
    pub async fn upsert_transcript(&self, session_id: &str, turns: &[ChatTurn]) -> Result<(), Error> {
        let payload = json!([{
            "conversation_id": session_id,
            "messages": turns,
        }]);
        let response = self
            .authorized(self.http.post(self.table_url()))
            .query(&[("on_conflict", "conversation_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Supabase upsert failed with {}: {}", status, body));
        }
        Ok(())
    }

    /// Most recently created transcripts first.
    pub async fn list_conversations(&self, limit: usize) -> Result<Vec<StoredConversation>, Error> {
        let limit = limit.to_string();
        let response = self
            .authorized(self.http.get(self.table_url()))
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Supabase query failed with {}: {}", status, body));
        }
        Ok(response.json().await?)
    }
}

/// Best effort persistence of transcripts. Failures are logged and
/// reported as `false`, never returned as errors.
#[derive(Clone, Debug, Default)]
pub struct TranscriptPersister {
    client: Option<SupabaseClient>,
}

impl TranscriptPersister {
    pub fn new(client: Option<SupabaseClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> Option<&SupabaseClient> {
        self.client.as_ref()
    }

    pub async fn persist(&self, session_id: &str, turns: &[ChatTurn]) -> bool {
        let Some(client) = &self.client else {
            tracing::warn!("Supabase is not configured, skipping save for session {}", session_id);
            return false;
        };
        match client.upsert_transcript(session_id, turns).await {
            Ok(()) => {
                tracing::debug!(
                    "Conversation {} saved to Supabase ({} messages)",
                    session_id,
                    turns.len()
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to save conversation {} to Supabase: {}", session_id, e);
                false
            }
        }
    }
}
