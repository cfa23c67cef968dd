//! Credential relay.
//!
//! # Data Flow
//! ```text
//! path {idInstance, method, apiToken} + body {httpMethod, data}
//!     → request.rs (presence check, placeholder guard, body and method parse)
//!     → upstream.rs (build URL, one outbound call, classify reply)
//!     → service.rs (map to relayed JSON or error body)
//!     → error.rs (status + category taxonomy)
//! ```
//!
//! # Design Decisions
//! - One inbound request, one outbound request, no shared mutable state
//! - No retries; failures are reported once
//! - Upstream bodies are opaque JSON

pub mod error;
pub mod request;
pub mod service;
pub mod upstream;

pub use error::{ErrorBody, RelayError};
pub use request::{ProxyRequest, RelayBody};
pub use service::{RelayOutcome, RelayService};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamReply, UpstreamSetupError};
