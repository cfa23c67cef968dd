//! `POST /api/green-api/{idInstance}/{method}/{apiToken}`

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{OriginalUri, State};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::http::request::RELAY_PREFIX;
use crate::http::server::AppState;
use crate::relay::RelayError;

/// Relay handler for the wildcard route.
///
/// The raw path is split by hand so that empty segments reach validation
/// instead of falling through to a 404, and each segment is decoded on
/// its own so an encoded `/` stays inside its parameter.
pub async fn relay_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let (id_instance, method, api_token) = match split_params(uri.path()) {
        Ok(params) => params,
        Err(err) => return state.relay.reject("", err).into_response(),
    };

    match body {
        Ok(body) => state
            .relay
            .handle(&id_instance, &method, &api_token, &body)
            .await
            .into_response(),
        Err(rejection) => state
            .relay
            .reject_body(&id_instance, &method, &api_token, rejection.body_text())
            .into_response(),
    }
}

/// `POST /api/green-api` and `/api/green-api/` with no parameters at all.
pub async fn missing_params_handler(State(state): State<AppState>) -> Response {
    state
        .relay
        .reject("", RelayError::missing_parameters())
        .into_response()
}

fn split_params(path: &str) -> Result<(String, String, String), RelayError> {
    let tail = path.strip_prefix(RELAY_PREFIX).unwrap_or(path);
    let mut parts = tail.split('/');
    let id_instance = decode_segment(parts.next())?;
    let method = decode_segment(parts.next())?;
    let api_token = decode_segment(parts.next())?;

    if parts.next().is_some() {
        return Err(RelayError::InvalidRequest(
            "Unexpected path segments after apiToken".to_string(),
        ));
    }

    Ok((id_instance, method, api_token))
}

fn decode_segment(segment: Option<&str>) -> Result<String, RelayError> {
    let segment = segment.unwrap_or_default();
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RelayError::InvalidRequest(format!("Path segment '{}' is not valid UTF-8", segment)))
}
