//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, redacted span)
//!     → relay.rs | health.rs | static_files.rs
//!     → response.rs (status + JSON body)
//!     → Send to client
//! ```

pub mod health;
pub mod relay;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
