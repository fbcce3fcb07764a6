use super::Notifier;
use crate::config::NotifierConfig;
use crate::error::RelayError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    phone: &'a str,
    message: &'a str,
}

/// Client for the Z-API WhatsApp text endpoint
pub struct ZapiClient {
    client: reqwest::Client,
    config: NotifierConfig,
}

impl ZapiClient {
    pub fn new(config: NotifierConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build notifier HTTP client")?;

        Ok(Self { client, config })
    }

    fn send_text_url(&self) -> String {
        format!(
            "{}/instances/{}/token/{}/send-text",
            self.config.api_base.trim_end_matches('/'),
            self.config.instance,
            self.config.token
        )
    }
}

#[async_trait]
impl Notifier for ZapiClient {
    fn name(&self) -> &str {
        "zapi"
    }

    async fn send_text(&self, destination: &str, message: &str) -> Result<(), RelayError> {
        let failed = |reason: String| RelayError::Notification {
            recipient: destination.to_string(),
            reason,
        };

        let response = self
            .client
            .post(self.send_text_url())
            .header("Client-Token", &self.config.client_token)
            .json(&SendTextRequest {
                phone: destination,
                message,
            })
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("API error {}: {}", status, body)));
        }

        info!("Sent notification to {}", destination);
        Ok(())
    }
}
