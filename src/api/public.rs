//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use crate::core::{Locale, RunMode};
use crate::openai::{AssistantError, ErrorKind};

// Errors

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.to_string(),
                details: None,
            },
        }
    }

    pub fn bad_request(error: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    /// A failed exchange rendered for the end user. The raw error is
    /// only attached outside of production.
    pub fn from_assistant(err: &AssistantError, locale: Locale, run_mode: RunMode) -> Self {
        let mut api_error = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            err.kind().user_message(locale),
        );
        if !run_mode.is_production() {
            api_error.body.details = Some(err.to_string());
        }
        api_error
    }

    /// Any other internal failure. Same exposure rules as
    /// `from_assistant`.
    pub fn internal(err: &anyhow::Error, locale: Locale, run_mode: RunMode) -> Self {
        tracing::error!("{}", err);
        let mut api_error = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Generic.user_message(locale),
        );
        if !run_mode.is_production() {
            api_error.body.details = Some(err.to_string());
        }
        api_error
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod env {
    pub use crate::api::routes::env::public::*;
}

pub mod history {
    pub use crate::api::routes::history::public::*;
}
