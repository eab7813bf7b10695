//! Public types for the environment check API
use serde::Serialize;

use crate::core::RunMode;

/// Presence of each recognized setting. Values are never echoed back.
#[derive(Serialize)]
pub struct EnvironmentCheck {
    #[serde(rename = "OPENAI_API_KEY")]
    pub openai_api_key: &'static str,
    #[serde(rename = "OPENAI_ASSISTANT_ID")]
    pub openai_assistant_id: &'static str,
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: &'static str,
    #[serde(rename = "SUPABASE_SERVICE_ROLE_KEY")]
    pub supabase_service_role_key: &'static str,
    #[serde(rename = "NODE_ENV")]
    pub node_env: RunMode,
}

#[derive(Serialize)]
pub struct EnvironmentCheckResponse {
    pub message: String,
    pub environment: EnvironmentCheck,
    pub timestamp: String,
}
