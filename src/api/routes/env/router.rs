//! Router for the environment check API

use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};

use super::public;
use crate::api::routes::method_not_allowed;
use crate::api::state::SharedState;

fn presence<T>(value: &Option<T>) -> &'static str {
    if value.is_some() { "✅ Set" } else { "❌ Not set" }
}

/// Report which settings are present
async fn check_env(State(state): State<SharedState>) -> Json<public::EnvironmentCheckResponse> {
    let config = &state.config;
    Json(public::EnvironmentCheckResponse {
        message: String::from("Environment variables check"),
        environment: public::EnvironmentCheck {
            openai_api_key: presence(&config.openai_api_key),
            openai_assistant_id: presence(&config.openai_assistant_id),
            supabase_url: presence(&config.supabase_url),
            supabase_service_role_key: presence(&config.supabase_service_role_key),
            node_env: config.run_mode,
        },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Create the environment check router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(check_env).fallback(method_not_allowed))
}
