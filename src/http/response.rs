//! Response mapping.
//!
//! # Responsibilities
//! - Relayed upstream JSON keeps the upstream status
//! - Relay errors become `{error, message, details?}` with their own status

use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::relay::{RelayError, RelayOutcome};

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}
