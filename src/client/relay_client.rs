//! HTTP client for the relay endpoint.

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::client::phone;

/// File name sent with `sendFileByUrl`.
pub const DEFAULT_FILE_NAME: &str = "file.png";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("idInstance and apiTokenInstance are required")]
    MissingCredentials,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("phone number '{0}' must contain 10-15 digits in international format")]
    InvalidPhone(String),

    #[error("file URL must start with http:// or https://")]
    InvalidFileUrl,

    #[error("invalid relay URL: {0}")]
    InvalidRelayUrl(String),

    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// GREEN-API instance credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    id_instance: String,
    api_token: String,
}

impl Credentials {
    /// Trimmed credentials; both must be non-empty.
    pub fn new(id_instance: &str, api_token: &str) -> Result<Self, ClientError> {
        let id_instance = id_instance.trim();
        let api_token = api_token.trim();
        if id_instance.is_empty() || api_token.is_empty() {
            return Err(ClientError::MissingCredentials);
        }
        Ok(Self {
            id_instance: id_instance.to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn id_instance(&self) -> &str {
        &self.id_instance
    }
}

/// Status and JSON body returned by the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub status: u16,
    pub body: Value,
}

impl RelayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayPayload<'a> {
    http_method: &'a str,
    data: Option<Value>,
}

/// Client for one relay deployment and one instance.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    relay_url: Url,
    credentials: Credentials,
}

impl RelayClient {
    pub fn new(relay_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let relay_url = Url::parse(relay_url)
            .map_err(|e| ClientError::InvalidRelayUrl(format!("{}: {}", relay_url, e)))?;
        if relay_url.cannot_be_a_base() {
            return Err(ClientError::InvalidRelayUrl(relay_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            relay_url,
            credentials,
        })
    }

    /// `<relay>/api/green-api/<id>/<method>/<token>`
    pub fn endpoint(&self, method: &str) -> Url {
        let mut url = self.relay_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "green-api"])
                .push(&self.credentials.id_instance)
                .push(method)
                .push(&self.credentials.api_token);
        }
        url
    }

    pub async fn get_settings(&self) -> Result<RelayReply, ClientError> {
        self.call("getSettings", "GET", None).await
    }

    pub async fn get_state_instance(&self) -> Result<RelayReply, ClientError> {
        self.call("getStateInstance", "GET", None).await
    }

    pub async fn send_message(&self, phone: &str, message: &str) -> Result<RelayReply, ClientError> {
        let data = message_payload(phone, message)?;
        self.call("sendMessage", "POST", Some(data)).await
    }

    pub async fn send_file_by_url(&self, phone: &str, file_url: &str) -> Result<RelayReply, ClientError> {
        let data = file_payload(phone, file_url)?;
        self.call("sendFileByUrl", "POST", Some(data)).await
    }

    /// Relay an arbitrary upstream method.
    pub async fn call(
        &self,
        method: &str,
        http_method: &str,
        data: Option<Value>,
    ) -> Result<RelayReply, ClientError> {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(&RelayPayload { http_method, data })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok(RelayReply { status, body })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ClientError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// `sendMessage` data after local validation.
pub fn message_payload(phone: &str, message: &str) -> Result<Value, ClientError> {
    let phone = required(phone, "phone number")?;
    let message = required(message, "message text")?;
    Ok(json!({
        "chatId": phone::chat_id(phone)?,
        "message": message,
    }))
}

/// `sendFileByUrl` data after local validation.
pub fn file_payload(phone: &str, file_url: &str) -> Result<Value, ClientError> {
    let phone = required(phone, "phone number")?;
    let file_url = required(file_url, "file URL")?;
    let chat_id = phone::chat_id(phone)?;
    if !file_url.starts_with("http://") && !file_url.starts_with("https://") {
        return Err(ClientError::InvalidFileUrl);
    }
    Ok(json!({
        "chatId": chat_id,
        "urlFile": file_url,
        "fileName": DEFAULT_FILE_NAME,
    }))
}
