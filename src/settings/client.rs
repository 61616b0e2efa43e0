//! HTTP client for the settings API
//!
//! Thin typed wrapper over `reqwest`: one GET to read the current settings,
//! one POST to test-and-save new ones. Status codes map onto
//! [`SettingsError`] variants so the modal can show the right message.

use super::{
    validate_integration, IntegrationSettings, SaveResponse, SettingsError, SettingsUpdate,
};
use crate::config::SettingsApiConfig;
use std::time::Duration;

/// Client for `{base_url}/api/settings/{integration}`
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SettingsClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl SettingsClient {
    pub fn new(config: &SettingsApiConfig) -> Result<Self, SettingsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SettingsError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::debug!(
            base_url = %base_url,
            authenticated = config.token.is_some(),
            "Settings client ready"
        );

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, integration: &str) -> Result<String, SettingsError> {
        validate_integration(integration)?;
        Ok(format!("{}/api/settings/{}", self.base_url, integration))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    /// Fetch the current settings for `integration`
    pub async fn get(&self, integration: &str) -> Result<IntegrationSettings, SettingsError> {
        let url = self.endpoint(integration)?;
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| SettingsError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SettingsError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SettingsError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| SettingsError::Decode(e.to_string()))
    }

    /// Validate locally, then ask the server to test and persist the update
    ///
    /// An update that fails local validation is never sent.
    pub async fn save(
        &self,
        integration: &str,
        update: &SettingsUpdate,
    ) -> Result<SaveResponse, SettingsError> {
        let url = self.endpoint(integration)?;
        let update = update.validate()?;

        let response = self
            .authorize(self.client.post(&url))
            .json(&update)
            .send()
            .await
            .map_err(|e| SettingsError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SettingsError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = SettingsError::from_response(status.as_u16(), &body);
            tracing::warn!(integration, status = status.as_u16(), "Settings save rejected: {}", err);
            return Err(err);
        }

        let saved: SaveResponse =
            serde_json::from_str(&body).map_err(|e| SettingsError::Decode(e.to_string()))?;

        // A 2xx that reports failure is treated like a failed connection test
        if !saved.success {
            return Err(SettingsError::Connection(saved.message));
        }

        tracing::info!(integration, server_url = %update.server_url, "Settings saved");
        Ok(saved)
    }
}
