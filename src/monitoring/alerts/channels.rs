//! Notification channel implementations

use crate::monitoring::types::{Alert, AlertSeverity};
use crate::utils::error::{CdnError, Result};
use crate::utils::net::client::WEBHOOK_TIMEOUT;
use crate::utils::net::{ClientUtils, HttpClientConfig};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

/// Notification channel trait
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Send a notification
    async fn send(&self, alert: &Alert) -> Result<()>;

    /// Get channel name
    fn name(&self) -> &str;

    /// Check if channel supports severity level
    fn supports_severity(&self, severity: AlertSeverity) -> bool;
}

/// Generic JSON webhook (Slack-compatible `text` field)
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    url: String,
    domain: String,
    min_severity: AlertSeverity,
    client: Client,
}

impl WebhookChannel {
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Result<Self> {
        let client =
            ClientUtils::create_http_client(&HttpClientConfig::with_timeout(WEBHOOK_TIMEOUT))?;
        Ok(Self {
            url: url.into(),
            domain: domain.into(),
            min_severity: AlertSeverity::Warning,
            client,
        })
    }

    pub fn with_min_severity(mut self, severity: AlertSeverity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// POST an arbitrary JSON payload to the webhook
    pub async fn post(&self, payload: &Value) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| CdnError::Notification(format!("Failed to send webhook: {}", e)))?;

        if !response.status().is_success() {
            return Err(CdnError::Notification(format!(
                "Webhook returned status: {}",
                response.status()
            )));
        }
        debug!("Webhook delivered to {}", self.url);
        Ok(())
    }
}

#[async_trait::async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(&self, alert: &Alert) -> Result<()> {
        let payload = json!({
            "text": format!(
                "[{}] {} on {}: {}",
                alert.severity, alert.title, self.domain, alert.description
            ),
            "alert": alert,
            "domain": self.domain,
        });
        self.post(&payload).await
    }

    fn name(&self) -> &str {
        "webhook"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}
