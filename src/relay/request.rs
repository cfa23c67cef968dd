//! Inbound relay request model and validation.

use axum::http::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::relay::error::RelayError;

/// `idInstance` value shipped in the demo form.
pub const PLACEHOLDER_ID_INSTANCE: &str = "123";

/// `apiTokenInstance` value shipped in the demo form.
pub const PLACEHOLDER_API_TOKEN: &str = "asd";

/// JSON body posted by the form: `{httpMethod?, data?}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayBody {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RelayBody {
    /// Parse a raw body. An empty body is treated as `{}`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RelayError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|e| {
            RelayError::InvalidRequest(format!("Request body must be a JSON object: {}", e))
        })
    }
}

/// Validated request ready to be sent upstream.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub id_instance: String,
    pub method: String,
    pub api_token: String,
    pub http_method: Method,
    pub data: Option<Value>,
}

impl ProxyRequest {
    /// Validate path parameters and the raw body.
    ///
    /// Checks run in order: presence, then placeholder credentials (when
    /// `reject_placeholders` is set), then the body, then the HTTP method.
    /// The first two never look at the body.
    pub fn new(
        id_instance: &str,
        method: &str,
        api_token: &str,
        body: &[u8],
        reject_placeholders: bool,
    ) -> Result<Self, RelayError> {
        Self::check_params(id_instance, method, api_token, reject_placeholders)?;

        let body = RelayBody::from_slice(body)?;
        let http_method = parse_http_method(body.http_method.as_deref())?;

        Ok(Self {
            id_instance: id_instance.to_string(),
            method: method.to_string(),
            api_token: api_token.to_string(),
            http_method,
            data: body.data,
        })
    }

    /// Presence and placeholder checks on the path parameters alone.
    pub fn check_params(
        id_instance: &str,
        method: &str,
        api_token: &str,
        reject_placeholders: bool,
    ) -> Result<(), RelayError> {
        if id_instance.is_empty() || method.is_empty() || api_token.is_empty() {
            return Err(RelayError::missing_parameters());
        }

        if reject_placeholders && is_placeholder(id_instance, api_token) {
            return Err(RelayError::InvalidCredentials);
        }

        Ok(())
    }
}

/// Demo guard: the form's sample values are never real credentials.
pub fn is_placeholder(id_instance: &str, api_token: &str) -> bool {
    id_instance == PLACEHOLDER_ID_INSTANCE || api_token == PLACEHOLDER_API_TOKEN
}

fn parse_http_method(raw: Option<&str>) -> Result<Method, RelayError> {
    let raw = match raw.map(str::trim) {
        Some(m) if !m.is_empty() => m,
        _ => return Ok(Method::GET),
    };

    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .map_err(|_| RelayError::InvalidRequest(format!("Unsupported httpMethod '{}'", raw)))
}
