use std::env;
use std::time::Duration;

use serde::Serialize;

/// Controls whether raw error detail is exposed to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    /// Anything other than `development` is treated as production so
    /// error details never leak by accident.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => RunMode::Development,
            _ => RunMode::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == RunMode::Production
    }
}

/// Language of the user facing error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    Vi,
    En,
}

impl Locale {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Locale::En,
            _ => Locale::Vi,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: Option<String>,
    pub openai_assistant_id: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub supabase_table: String,
    pub run_mode: RunMode,
    pub locale: Locale,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub session_ttl: Duration,
    pub request_timeout: Duration,
}

// Treat empty strings the same as unset
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match non_empty_var(name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {}", name, raw);
            default
        }),
        None => default,
    }
}

impl AppConfig {
    /// Load configuration from the environment. Missing credentials
    /// are logged but do not abort startup. Requests that need them
    /// fail with a configuration error instead.
    pub fn from_env() -> Self {
        let run_mode = non_empty_var("VOICECHAT_ENV")
            .or_else(|| non_empty_var("NODE_ENV"))
            .map(|v| RunMode::parse(&v))
            .unwrap_or(RunMode::Production);
        let locale = non_empty_var("VOICECHAT_LOCALE")
            .map(|v| Locale::parse(&v))
            .unwrap_or(Locale::Vi);

        let config = Self {
            openai_api_hostname: non_empty_var("OPENAI_API_HOST")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_assistant_id: non_empty_var("OPENAI_ASSISTANT_ID"),
            supabase_url: non_empty_var("SUPABASE_URL"),
            supabase_service_role_key: non_empty_var("SUPABASE_SERVICE_ROLE_KEY"),
            supabase_table: non_empty_var("SUPABASE_TABLE")
                .unwrap_or_else(|| "conversations_web_chatbot".to_string()),
            run_mode,
            locale,
            poll_interval: Duration::from_millis(parse_var("VOICECHAT_POLL_INTERVAL_MS", 1000)),
            poll_max_attempts: parse_var("VOICECHAT_POLL_MAX_ATTEMPTS", 60),
            session_ttl: Duration::from_secs(parse_var("VOICECHAT_SESSION_TTL_SECS", 60 * 60 * 24)),
            request_timeout: Duration::from_secs(parse_var("VOICECHAT_REQUEST_TIMEOUT_SECS", 60)),
        };

        for name in config.missing() {
            tracing::error!("{} is not set", name);
        }

        config
    }

    /// Names of the recognized credentials that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("OPENAI_API_KEY", self.openai_api_key.is_some()),
            ("OPENAI_ASSISTANT_ID", self.openai_assistant_id.is_some()),
            ("SUPABASE_URL", self.supabase_url.is_some()),
            (
                "SUPABASE_SERVICE_ROLE_KEY",
                self.supabase_service_role_key.is_some(),
            ),
        ]
        .into_iter()
        .filter_map(|(name, is_set)| (!is_set).then_some(name))
        .collect()
    }
}
