//! Failures of an exchange with the assistant service and the user
//! facing messages shown for each kind of failure.

use http::StatusCode;
use thiserror::Error;

use crate::core::Locale;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("OpenAI {0} is not configured")]
    Configuration(&'static str),

    #[error("Failed to create thread: {0}")]
    ThreadCreation(String),

    #[error("Failed to create run: {0}")]
    RunCreation(String),

    #[error("No response from assistant")]
    EmptyReply,

    #[error("Run failed: {0}")]
    RunFailed(String),

    #[error("Run ended with status: {0}")]
    UnexpectedStatus(String),

    #[error("Run did not finish after {attempts} status checks")]
    PollTimeout { attempts: u32 },

    #[error("Invalid response from assistant API: {0}")]
    InvalidResponse(String),

    #[error("Assistant API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Timeout(err)
        } else if err.is_decode() {
            AssistantError::InvalidResponse(err.to_string())
        } else {
            AssistantError::Network(err)
        }
    }
}

/// Coarse classification used to pick a message for the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Network,
    Busy,
    Generic,
}

impl AssistantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::Configuration(_) => ErrorKind::Configuration,
            AssistantError::Api { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Configuration,
                StatusCode::TOO_MANY_REQUESTS => ErrorKind::Busy,
                s if s.is_server_error() => ErrorKind::Busy,
                _ => ErrorKind::Generic,
            },
            AssistantError::Network(_) => ErrorKind::Network,
            AssistantError::Timeout(_) | AssistantError::PollTimeout { .. } => ErrorKind::Busy,
            AssistantError::ThreadCreation(_)
            | AssistantError::RunCreation(_)
            | AssistantError::EmptyReply
            | AssistantError::InvalidResponse(_)
            | AssistantError::RunFailed(_)
            | AssistantError::UnexpectedStatus(_) => ErrorKind::Generic,
        }
    }

    /// Short name of the step that failed, used in logs.
    pub fn stage(&self) -> &'static str {
        match self {
            AssistantError::Configuration(_) => "config",
            AssistantError::ThreadCreation(_) => "create_thread",
            AssistantError::RunCreation(_) => "create_run",
            AssistantError::EmptyReply => "fetch_reply",
            AssistantError::RunFailed(_)
            | AssistantError::UnexpectedStatus(_)
            | AssistantError::PollTimeout { .. } => "poll_run",
            AssistantError::InvalidResponse(_)
            | AssistantError::Api { .. }
            | AssistantError::Timeout(_)
            | AssistantError::Network(_) => "transport",
        }
    }
}

impl ErrorKind {
    pub fn user_message(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Vi, ErrorKind::Configuration) => "Lỗi cấu hình API. Vui lòng kiểm tra lại.",
            (Locale::Vi, ErrorKind::Network) => "Lỗi kết nối mạng. Vui lòng kiểm tra internet.",
            (Locale::Vi, ErrorKind::Busy) => "Hệ thống đang bận. Vui lòng thử lại sau.",
            (Locale::Vi, ErrorKind::Generic) => "Có lỗi xảy ra. Vui lòng thử lại.",
            (Locale::En, ErrorKind::Configuration) => {
                "API configuration error. Please check the settings."
            }
            (Locale::En, ErrorKind::Network) => {
                "Network connection error. Please check your internet connection."
            }
            (Locale::En, ErrorKind::Busy) => "The system is busy. Please try again later.",
            (Locale::En, ErrorKind::Generic) => "Something went wrong. Please try again.",
        }
    }
}
