//! Relay handler: validate, forward once, classify.

use std::time::Instant;

use axum::http::{Method, StatusCode};
use serde_json::Value;

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::error::RelayError;
use crate::relay::request::ProxyRequest;
use crate::relay::upstream::{UpstreamClient, UpstreamReply, UpstreamSetupError};

/// Metrics label for calls rejected before `httpMethod` was read.
const UNKNOWN_METHOD: &str = "unknown";

/// Result of one relay call.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Upstream JSON with the upstream status, success or not.
    Relayed { status: StatusCode, body: Value },
    /// Synthesized error.
    Rejected(RelayError),
}

impl RelayOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Relayed { status, .. } => *status,
            Self::Rejected(err) => err.status(),
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Relayed { .. } => "relayed",
            Self::Rejected(err) => err.category(),
        }
    }

    /// `(statusCode, bodyJSON)` as sent to the caller.
    pub fn into_parts(self) -> (StatusCode, Value) {
        match self {
            Self::Relayed { status, body } => (status, body),
            Self::Rejected(err) => (err.status(), err.to_body().into_value()),
        }
    }
}

/// Stateless relay shared by all requests.
#[derive(Debug, Clone)]
pub struct RelayService {
    upstream: UpstreamClient,
    reject_placeholders: bool,
}

impl RelayService {
    pub fn new(config: &RelayConfig) -> Result<Self, UpstreamSetupError> {
        Ok(Self {
            upstream: UpstreamClient::new(&config.upstream)?,
            reject_placeholders: config.relay.reject_placeholder_credentials,
        })
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Handle one relay call. Never fails: every error becomes a
    /// [`RelayOutcome::Rejected`].
    pub async fn handle(
        &self,
        id_instance: &str,
        method: &str,
        api_token: &str,
        body: &[u8],
    ) -> RelayOutcome {
        let start = Instant::now();

        let (http_method, result) =
            match ProxyRequest::new(id_instance, method, api_token, body, self.reject_placeholders) {
                Ok(request) => (Some(request.http_method.clone()), self.relay(&request).await),
                Err(err) => (None, Err(err)),
            };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                log_failure(method, &err);
                RelayOutcome::Rejected(err)
            }
        };

        let http_method = http_method.as_ref().map(Method::as_str).unwrap_or(UNKNOWN_METHOD);
        metrics::record_relay(http_method, outcome.label(), outcome.status().as_u16(), start);
        outcome
    }

    /// Report a call whose body could not be read. Parameter errors still
    /// take precedence over the body failure.
    pub fn reject_body(
        &self,
        id_instance: &str,
        method: &str,
        api_token: &str,
        reason: impl std::fmt::Display,
    ) -> RelayOutcome {
        let err = match ProxyRequest::check_params(id_instance, method, api_token, self.reject_placeholders) {
            Err(err) => err,
            Ok(()) => RelayError::unreadable_body(reason),
        };
        self.reject(method, err)
    }

    /// Report a call rejected before its body was read.
    pub fn reject(&self, method: &str, err: RelayError) -> RelayOutcome {
        let start = Instant::now();
        log_failure(method, &err);
        let outcome = RelayOutcome::Rejected(err);
        metrics::record_relay(UNKNOWN_METHOD, outcome.label(), outcome.status().as_u16(), start);
        outcome
    }

    async fn relay(&self, request: &ProxyRequest) -> Result<RelayOutcome, RelayError> {
        tracing::info!(
            upstream = %self.upstream.redacted_endpoint(request),
            http_method = %request.http_method,
            has_data = request.data.is_some(),
            "Relaying request"
        );

        match self.upstream.call(request).await? {
            UpstreamReply::Json { status, body } => {
                tracing::debug!(status = %status, "Upstream replied with JSON");
                Ok(RelayOutcome::Relayed { status, body })
            }
            UpstreamReply::NotJson { status, text } => {
                tracing::warn!(
                    status = %status,
                    preview = %crate::relay::error::truncate_details(&text),
                    "Upstream replied with non-JSON body"
                );
                Err(RelayError::NonJsonResponse {
                    status: status.as_u16(),
                    body: text,
                })
            }
        }
    }
}

fn log_failure(method: &str, err: &RelayError) {
    match err {
        RelayError::InvalidRequest(_) | RelayError::InvalidCredentials => {
            tracing::warn!(method = %method, error = %err, "Relay request rejected");
        }
        _ => {
            tracing::error!(method = %method, error = %err, "Relay request failed");
        }
    }
}
