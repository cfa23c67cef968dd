//! Relay client: the form's actions as a Rust library.
//!
//! # Data Flow
//! ```text
//! credentials + action fields
//!     → phone.rs (normalize, validate, chat ID)
//!     → relay_client.rs (POST {httpMethod, data} to the relay)
//!     → (status, JSON) back to the caller
//! ```

pub mod phone;
pub mod relay_client;

pub use phone::{chat_id, is_valid_phone, normalize_phone};
pub use relay_client::{ClientError, Credentials, RelayClient, RelayReply};
