//! Client-facing error taxonomy for the relay endpoint.

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::relay::upstream::UpstreamError;

/// Longest slice of a non-JSON upstream body echoed back to the caller.
pub const DETAILS_LIMIT: usize = 200;

/// Failures surfaced to relay callers.
///
/// Each variant maps to exactly one status code and category string.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing path parameters or an unusable request body.
    #[error("{0}")]
    InvalidRequest(String),

    /// Demo placeholder credentials were submitted.
    #[error("placeholder credentials rejected")]
    InvalidCredentials,

    /// Upstream answered without a JSON content type.
    #[error("upstream returned non-JSON response with status {status}")]
    NonJsonResponse { status: u16, body: String },

    /// Upstream claimed JSON but the body did not parse.
    #[error("upstream returned malformed JSON: {0}")]
    MalformedJson(String),

    /// Upstream host could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// Anything not classified above.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every synthesized error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn into_value(self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "error": self.error,
            "message": self.message,
        });
        if let Some(details) = self.details {
            value["details"] = serde_json::Value::String(details);
        }
        value
    }
}

impl RelayError {
    pub fn missing_parameters() -> Self {
        Self::InvalidRequest(
            "Missing required parameters: idInstance, method or apiToken".to_string(),
        )
    }

    pub fn unreadable_body(reason: impl std::fmt::Display) -> Self {
        Self::InvalidRequest(format!("Request body could not be read: {}", reason))
    }

    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidCredentials | Self::MalformedJson(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NonJsonResponse { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Category string placed in the `error` field.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid request",
            Self::InvalidCredentials => "invalid credentials",
            Self::NonJsonResponse { .. } | Self::MalformedJson(_) => "invalid API response",
            Self::Network(_) => "network error",
            Self::Internal(_) => "internal server error",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let (message, details) = match self {
            Self::InvalidRequest(message) => (message.clone(), None),
            Self::InvalidCredentials => (
                "Please enter a valid idInstance and ApiTokenInstance from your GREEN-API account"
                    .to_string(),
                None,
            ),
            Self::NonJsonResponse { status, body } => (
                format!(
                    "GREEN-API returned a non-JSON response. Status: {}. \
                     This usually means invalid credentials or API endpoint.",
                    status
                ),
                Some(truncate_details(body)),
            ),
            Self::MalformedJson(_) => (
                "GREEN-API returned an invalid response. Please check your credentials \
                 (idInstance and ApiTokenInstance)."
                    .to_string(),
                Some(
                    "Make sure you are using real credentials from your GREEN-API account, \
                     not placeholders."
                        .to_string(),
                ),
            ),
            Self::Network(cause) => (
                "Unable to connect to GREEN-API. Please check your internet connection."
                    .to_string(),
                Some(cause.clone()),
            ),
            Self::Internal(cause) => (
                "Unexpected error while relaying the request".to_string(),
                Some(cause.clone()),
            ),
        };

        ErrorBody {
            error: self.category(),
            message,
            details,
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Connect(cause) | UpstreamError::Timeout(cause) => Self::Network(cause),
            UpstreamError::InvalidJson(cause) => Self::MalformedJson(cause),
            UpstreamError::Request(cause) | UpstreamError::Body(cause) => Self::Internal(cause),
        }
    }
}

/// First [`DETAILS_LIMIT`] characters, with `...` appended when cut.
pub fn truncate_details(text: &str) -> String {
    match text.char_indices().nth(DETAILS_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
