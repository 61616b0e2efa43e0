//! Integration settings contract
//!
//! Wire types for the external settings API (`/api/settings/{integration}`)
//! and the error taxonomy the settings modal branches on. The HTTP client
//! lives in [`client`].

pub mod client;

pub use client::SettingsClient;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current settings as reported by the server
///
/// The API key itself is never returned, only whether one is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntegrationSettings {
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub api_key_configured: bool,
}

/// Payload for `POST /api/settings/{integration}`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SettingsUpdate {
    pub server_url: String,
    pub api_key: String,
}

impl fmt::Debug for SettingsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsUpdate")
            .field("server_url", &self.server_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SettingsUpdate {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Local pre-check that mirrors the server's 422 validation
    ///
    /// The URL must parse with an http/https scheme and the key must be
    /// non-blank. Whitespace around either value is trimmed first.
    pub fn validate(&self) -> Result<Self, SettingsError> {
        let server_url = self.server_url.trim();
        let api_key = self.api_key.trim();

        if server_url.is_empty() {
            return Err(SettingsError::Validation("Server URL is required".into()));
        }

        let parsed = reqwest::Url::parse(server_url)
            .map_err(|e| SettingsError::Validation(format!("Invalid server URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::Validation(format!(
                "Server URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(SettingsError::Validation("Server URL has no host".into()));
        }

        if api_key.is_empty() {
            return Err(SettingsError::Validation("API key is required".into()));
        }

        Ok(Self::new(server_url, api_key))
    }
}

/// Successful save response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Error body returned with 4xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

/// `detail` is either a plain message or a list of field validation items
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Items(Vec<ValidationItem>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationItem {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ValidationItem {
    fn describe(&self) -> String {
        // "body" prefixes every request-body location and adds nothing for the user
        let path: Vec<String> = self
            .loc
            .iter()
            .filter(|v| v.as_str() != Some("body"))
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        if path.is_empty() {
            self.msg.clone()
        } else {
            format!("{}: {}", path.join("."), self.msg)
        }
    }
}

impl ErrorDetail {
    /// Human-readable message for display in the modal
    pub fn message(&self) -> String {
        match self {
            Self::Message(msg) => msg.clone(),
            Self::Items(items) => items
                .iter()
                .map(ValidationItem::describe)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Failure modes of a settings request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// 400: the server could not reach the integration with these settings
    Connection(String),
    /// 401: missing or rejected bearer token
    Unauthenticated(String),
    /// 422 or local pre-validation
    Validation(String),
    /// Any other non-success status
    Unexpected { status: u16, body: String },
    /// Request never completed (connect, timeout, ...)
    Transport(String),
    /// Success status with an undecodable body
    Decode(String),
}

impl SettingsError {
    /// Map a non-success response to an error kind
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail.message())
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                }
            });

        match status {
            400 => Self::Connection(detail),
            401 => Self::Unauthenticated(detail),
            422 => Self::Validation(detail),
            _ => Self::Unexpected {
                status,
                body: body.to_string(),
            },
        }
    }

    /// Message shown inline in the settings modal
    pub fn detail(&self) -> &str {
        match self {
            Self::Connection(d)
            | Self::Unauthenticated(d)
            | Self::Validation(d)
            | Self::Transport(d)
            | Self::Decode(d) => d,
            Self::Unexpected { body, .. } => body,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(d) => write!(f, "Connection test failed: {}", d),
            Self::Unauthenticated(d) => write!(f, "Not authenticated: {}", d),
            Self::Validation(d) => write!(f, "Invalid settings: {}", d),
            Self::Unexpected { status, body } => {
                write!(f, "Unexpected response ({}): {}", status, body)
            }
            Self::Transport(d) => write!(f, "Request failed: {}", d),
            Self::Decode(d) => write!(f, "Malformed response: {}", d),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Integration names are used as a URL path segment
pub fn validate_integration(name: &str) -> Result<(), SettingsError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(SettingsError::Validation(format!(
            "Invalid integration name '{}'",
            name
        )))
    }
}
