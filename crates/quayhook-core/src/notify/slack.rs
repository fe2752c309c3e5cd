use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::Notifier;
use crate::config::SlackConfig;
use crate::domain::{
    DomainError,
    DomainResult,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackPayload<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<&'a str>,
}

/// Posts messages to a Slack incoming webhook as a form-encoded `payload`.
pub struct SlackNotifier {
    client: Client,
    config: SlackConfig,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                DomainError::InternalError(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: SlackConfig) -> Self {
        Self { client, config }
    }

    pub fn payload<'a>(&'a self, message: &'a str) -> SlackPayload<'a> {
        SlackPayload {
            text: message,
            channel: non_empty(&self.config.channel),
            username: non_empty(&self.config.username),
            icon_emoji: non_empty(&self.config.icon_emoji),
        }
    }

    pub async fn send(&self, message: &str) -> DomainResult<()> {
        let payload = serde_json::to_string(&self.payload(message))
            .map_err(|e| DomainError::NotifierError(format!("Failed to encode payload: {}", e)))?;

        let response = self
            .client
            .post(&self.config.webhook_url)
            .form(&[("payload", payload.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::NotifierError(format!("POST failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::NotifierError(format!(
                "Slack responded with {}: {}",
                status, body
            )));
        }

        tracing::debug!(status = %status, "Slack notification delivered");
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, message: &str) {
        if let Err(e) = self.send(message).await {
            tracing::warn!(error = %e, "Slack notification failed");
        }
    }
}
