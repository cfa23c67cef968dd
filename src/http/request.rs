//! Request identification and tracing.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID unless the caller sent one
//! - Build the per-request tracing span
//! - Keep API tokens out of logged paths
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The token is always the last path segment of a relay call

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Prefix of the relay endpoint.
pub const RELAY_PREFIX: &str = "/api/green-api/";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the middleware.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers().request_id()
    }
}

/// Path safe to log: the token segment of relay calls is masked.
pub fn redact_path(path: &str) -> String {
    match path.strip_prefix(RELAY_PREFIX) {
        Some(rest) => match rest.rsplit_once('/') {
            Some((head, _token)) => format!("{}{}/***", RELAY_PREFIX, head),
            None => path.to_string(),
        },
        None => path.to_string(),
    }
}

/// Span for `TraceLayer::make_span_with`.
pub fn make_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %request.request_id(),
        method = %request.method(),
        path = %redact_path(request.uri().path()),
    )
}
