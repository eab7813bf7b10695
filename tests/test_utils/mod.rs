//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body};
use mockito::{Mock, ServerGuard};
use serde_json::Value;

use voicechat::api::{AppState, SharedState, app};
use voicechat::core::{AppConfig, Locale, RunMode};

/// Configuration pointing both external services at local mock
/// servers. Polling is fast so tests don't wait a second per check.
pub fn test_config(openai_url: &str, supabase_url: Option<&str>) -> AppConfig {
    AppConfig {
        openai_api_hostname: openai_url.to_string(),
        openai_api_key: Some(String::from("test-api-key")),
        openai_assistant_id: Some(String::from("asst_test")),
        supabase_url: supabase_url.map(str::to_string),
        supabase_service_role_key: supabase_url.map(|_| String::from("test-service-key")),
        supabase_table: String::from("conversations_web_chatbot"),
        run_mode: RunMode::Production,
        locale: Locale::Vi,
        poll_interval: Duration::from_millis(1),
        poll_max_attempts: 5,
        session_ttl: Duration::from_secs(60),
        request_timeout: Duration::from_secs(5),
    }
}

/// Creates a test application router and a handle on its state so
/// tests can inspect the session store.
pub fn test_app(config: AppConfig) -> (Router, SharedState) {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    (app(Arc::clone(&state)), state)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not json")
}

/// Mock the thread, message and run creation calls of an exchange.
pub async fn mock_run_setup(server: &mut ServerGuard) -> Vec<Mock> {
    let thread = server
        .mock("POST", "/v1/threads")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "thread_abc", "object": "thread"}"#)
        .create_async()
        .await;
    let message = server
        .mock("POST", "/v1/threads/thread_abc/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "msg_user", "role": "user"}"#)
        .create_async()
        .await;
    let run = server
        .mock("POST", "/v1/threads/thread_abc/runs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_1", "status": "queued"}"#)
        .create_async()
        .await;
    vec![thread, message, run]
}

pub async fn mock_run_status(server: &mut ServerGuard, status_body: &str) -> Mock {
    server
        .mock("GET", "/v1/threads/thread_abc/runs/run_1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(status_body)
        .create_async()
        .await
}

/// Mock a full successful exchange that replies with `reply`.
pub async fn mock_assistant_reply(server: &mut ServerGuard, reply: &str) -> Vec<Mock> {
    let mut mocks = mock_run_setup(server).await;
    mocks.push(mock_run_status(server, r#"{"id": "run_1", "status": "completed"}"#).await);
    let body = serde_json::json!({
        "object": "list",
        "data": [
            {
                "id": "msg_reply",
                "role": "assistant",
                "content": [{"type": "text", "text": {"value": reply, "annotations": []}}]
            }
        ]
    });
    let messages = server
        .mock("GET", "/v1/threads/thread_abc/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
    mocks.push(messages);
    mocks
}

/// Mock the transcript upsert endpoint returning `status`.
pub async fn mock_supabase_upsert(server: &mut ServerGuard, status: usize) -> Mock {
    server
        .mock("POST", "/rest/v1/conversations_web_chatbot")
        .match_query(mockito::Matcher::Any)
        .with_status(status)
        .create_async()
        .await
}
