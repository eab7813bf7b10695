//! Client for the OpenAI Assistants API.
//!
//! One exchange creates a fresh thread, posts the user's message,
//! starts a run of the configured assistant and polls it until it
//! leaves the `queued`/`in_progress` states or the poll budget is
//! used up.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::AssistantError;
use crate::core::AppConfig;

pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a helpful AI assistant. Respond in the same language the user speaks.";

/// How often and how many times a run's status is checked before
/// giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

/// Status of a run as reported by the service. Values this client
/// doesn't know about are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    Other(String),
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "cancelled" => RunStatus::Cancelled,
            "failed" => RunStatus::Failed,
            "completed" => RunStatus::Completed,
            "incomplete" => RunStatus::Incomplete,
            "expired" => RunStatus::Expired,
            _ => RunStatus::Other(value),
        }
    }
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Other(s) => s,
        }
    }

    /// The run is still being worked on and needs another check.
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RunError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RunState {
    pub id: Option<String>,
    pub status: RunStatus,
    pub last_error: Option<RunError>,
}

// Creation responses are only inspected for their id
#[derive(Debug, Deserialize)]
struct CreatedObject {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

// Message content is a list of typed parts. Only text parts carry a
// reply; images and other parts are skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum MessageContent {
    #[serde(rename = "text")]
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    role: String,
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<ThreadMessage>,
}

/// Result of a successful exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub thread_id: String,
    pub reply: String,
}

#[derive(Clone, Debug)]
pub struct AssistantClient {
    http: reqwest::Client,
    api_hostname: String,
    api_key: Option<String>,
    assistant_id: Option<String>,
    instructions: String,
    poll: PollPolicy,
}

impl AssistantClient {
    pub fn new(
        api_hostname: &str,
        api_key: Option<&str>,
        assistant_id: Option<&str>,
        poll: PollPolicy,
        request_timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            assistant_id: assistant_id.map(str::to_string),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            poll,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        Self::new(
            &config.openai_api_hostname,
            config.openai_api_key.as_deref(),
            config.openai_assistant_id.as_deref(),
            PollPolicy {
                interval: config.poll_interval,
                max_attempts: config.poll_max_attempts,
            },
            config.request_timeout,
        )
    }

    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = instructions.to_string();
        self
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }

    fn api_key(&self) -> Result<&str, AssistantError> {
        self.api_key
            .as_deref()
            .ok_or(AssistantError::Configuration("API key"))
    }

    fn assistant_id(&self) -> Result<&str, AssistantError> {
        self.assistant_id
            .as_deref()
            .ok_or(AssistantError::Configuration("Assistant ID"))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, AssistantError> {
        let url = format!("{}/v1/{}", self.api_hostname, path);
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(self.api_key()?)
            .header("OpenAI-Beta", "assistants=v2"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AssistantError> {
        let response = request.send().await?;
        let response = error_for_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Create a new, empty conversation thread and return its id.
    pub async fn create_thread(&self) -> Result<String, AssistantError> {
        let request = self.request(reqwest::Method::POST, "threads")?.json(&json!({}));
        let thread: CreatedObject = self.send(request).await?;
        thread
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AssistantError::ThreadCreation("thread id is missing".to_string()))
    }

    pub async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError> {
        let request = self
            .request(reqwest::Method::POST, &format!("threads/{thread_id}/messages"))?
            .json(&json!({
                "role": "user",
                "content": content,
            }));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// Start a run of the configured assistant and return its id.
    pub async fn create_run(&self, thread_id: &str) -> Result<String, AssistantError> {
        let assistant_id = self.assistant_id()?;
        let request = self
            .request(reqwest::Method::POST, &format!("threads/{thread_id}/runs"))?
            .json(&json!({
                "assistant_id": assistant_id,
                "instructions": self.instructions,
            }));
        let run: CreatedObject = self.send(request).await?;
        run.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AssistantError::RunCreation("run id is missing".to_string()))
    }

    pub async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunState, AssistantError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("threads/{thread_id}/runs/{run_id}"),
        )?;
        self.send(request).await
    }

    /// Check the run until it is no longer pending. Gives up with
    /// `PollTimeout` once the poll policy's attempts are used up.
    pub async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<RunState, AssistantError> {
        let max_attempts = self.poll.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            let run = self.retrieve_run(thread_id, run_id).await?;
            attempts += 1;
            tracing::debug!("Run {} status: {}", run_id, run.status.as_str());

            if !run.status.is_pending() {
                return Ok(run);
            }
            if attempts >= max_attempts {
                tracing::warn!(
                    "Run {} still {} after {} checks, giving up",
                    run_id,
                    run.status.as_str(),
                    attempts
                );
                return Err(AssistantError::PollTimeout { attempts });
            }
            tokio::time::sleep(self.poll.interval).await;
        }
    }

    /// Text of the most recent assistant message in the thread.
    pub async fn latest_reply(&self, thread_id: &str) -> Result<String, AssistantError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("threads/{thread_id}/messages"),
        )?;
        // Messages are listed newest first
        let messages: MessageList = self.send(request).await?;
        messages
            .data
            .into_iter()
            .find(|m| m.role == "assistant")
            .and_then(|m| {
                m.content.into_iter().find_map(|part| match part {
                    MessageContent::Text { text } => Some(text.value),
                    MessageContent::Other => None,
                })
            })
            .ok_or(AssistantError::EmptyReply)
    }

    /// Run one full round trip for `message` and return the
    /// assistant's reply.
    pub async fn exchange(&self, message: &str) -> Result<Exchange, AssistantError> {
        // Fail before touching the network when credentials are missing
        self.api_key()?;
        self.assistant_id()?;

        let thread_id = self.create_thread().await?;
        tracing::debug!("Thread created: {}", thread_id);

        self.add_user_message(&thread_id, message).await?;

        let run_id = self.create_run(&thread_id).await?;
        tracing::debug!("Run created: {} (thread {})", run_id, thread_id);

        let run = self.wait_for_run(&thread_id, &run_id).await?;
        match run.status {
            RunStatus::Completed => {
                let reply = self.latest_reply(&thread_id).await?;
                Ok(Exchange { thread_id, reply })
            }
            RunStatus::Failed => {
                let message = run
                    .last_error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "unknown".to_string());
                Err(AssistantError::RunFailed(message))
            }
            other => Err(AssistantError::UnexpectedStatus(other.as_str().to_string())),
        }
    }
}

// Turn a non-2xx response into an `Api` error, preferring the
// service's own error message over the raw body.
async fn error_for_status(response: Response) -> Result<Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    Err(AssistantError::Api { status, message })
}
