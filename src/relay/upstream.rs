//! Outbound client for the upstream messaging API.
//!
//! # Responsibilities
//! - Build `<base>/waInstance<id>/<method>/<token>` from configuration
//! - Issue exactly one request per relay call (no retries)
//! - Split replies into JSON and non-JSON
//! - Turn client failures into a closed set of tagged errors
//!
//! # Design Decisions
//! - Failures are classified from `reqwest::Error` flags, never from message text
//! - URLs are stripped from error messages so tokens do not leak into responses

use std::error::Error as StdError;
use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::relay::request::ProxyRequest;

/// Outbound call failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// DNS resolution or TCP connect failed.
    #[error("{0}")]
    Connect(String),

    /// Configured deadline elapsed.
    #[error("{0}")]
    Timeout(String),

    /// Body announced as JSON could not be parsed.
    #[error("invalid json response body: {0}")]
    InvalidJson(String),

    /// Request could not be built or sent.
    #[error("{0}")]
    Request(String),

    /// Response body could not be read.
    #[error("{0}")]
    Body(String),
}

impl UpstreamError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let message = error_chain(&err);

        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_connect() {
            Self::Connect(message)
        } else if err.is_decode() {
            Self::InvalidJson(message)
        } else if err.is_body() {
            Self::Body(message)
        } else {
            Self::Request(message)
        }
    }
}

/// Errors constructing an [`UpstreamClient`].
#[derive(Debug, Error)]
pub enum UpstreamSetupError {
    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("upstream base URL '{0}' cannot have path segments")]
    NotABase(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Classified upstream reply.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    /// JSON body, relayed verbatim.
    Json { status: StatusCode, body: Value },
    /// Anything else, read as text.
    NotJson { status: StatusCode, text: String },
}

impl UpstreamReply {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Json { status, .. } | Self::NotJson { status, .. } => *status,
        }
    }
}

/// HTTP client bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamSetupError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamSetupError::NotABase(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        if config.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full upstream URL for a request. Segments are percent-encoded.
    pub fn endpoint(&self, req: &ProxyRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&format!("waInstance{}", req.id_instance))
                .push(&req.method)
                .push(&req.api_token);
        }
        url
    }

    /// Upstream URL with the API token masked, for logs.
    pub fn redacted_endpoint(&self, req: &ProxyRequest) -> String {
        format!(
            "{}/waInstance{}/{}/***",
            self.base_url.as_str().trim_end_matches('/'),
            req.id_instance,
            req.method
        )
    }

    /// Send one request upstream and classify the reply.
    pub async fn call(&self, req: &ProxyRequest) -> Result<UpstreamReply, UpstreamError> {
        let mut builder = self
            .client
            .request(req.http_method.clone(), self.endpoint(req))
            .header(CONTENT_TYPE, "application/json");

        if let Some(data) = &req.data {
            let payload = serde_json::to_vec(data).map_err(|e| UpstreamError::Request(e.to_string()))?;
            builder = builder.body(payload);
        }

        let response = builder.send().await.map_err(UpstreamError::from_reqwest)?;
        let status = response.status();

        if !is_json_content_type(response.headers().get(CONTENT_TYPE)) {
            let text = response.text().await.map_err(UpstreamError::from_reqwest)?;
            return Ok(UpstreamReply::NotJson { status, text });
        }

        let bytes = response.bytes().await.map_err(UpstreamError::from_reqwest)?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::InvalidJson(e.to_string()))?;

        Ok(UpstreamReply::Json { status, body })
    }
}

fn is_json_content_type(value: Option<&axum::http::HeaderValue>) -> bool {
    value
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Render an error with its source chain, `outer: inner: root`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
