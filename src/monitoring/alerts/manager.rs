//! Alert manager implementation

use super::channels::{NotificationChannel, WebhookChannel};
use super::types::{AlertStats, AlertStorage};
use crate::monitoring::types::Alert;
use crate::utils::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::RwLock as TokioRwLock;
use tracing::{debug, error, info, warn};

/// Alerts retained in history
pub const MAX_ALERTS: usize = 100;

/// Alert manager for recording and dispatching alerts
#[derive(Debug, Clone, Default)]
pub struct AlertManager {
    pub(super) storage: Arc<RwLock<AlertStorage>>,
    /// Notification channels - using tokio RwLock because we need to hold across await points
    pub(super) notification_channels: Arc<TokioRwLock<Vec<Box<dyn NotificationChannel>>>>,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alert manager forwarding to `webhook_url` when configured
    pub fn with_webhook(webhook_url: Option<&str>, domain: &str) -> Result<Self> {
        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();
        if let Some(url) = webhook_url {
            channels.push(Box::new(WebhookChannel::new(url, domain)?));
        }
        Ok(Self {
            storage: Arc::default(),
            notification_channels: Arc::new(TokioRwLock::new(channels)),
        })
    }

    pub async fn add_channel(&self, channel: Box<dyn NotificationChannel>) {
        info!("Adding notification channel: {}", channel.name());
        self.notification_channels.write().await.push(channel);
    }

    /// Record an alert and forward it to every channel accepting its severity.
    /// Delivery failures are logged and counted, never returned.
    pub async fn send_alert(&self, alert: Alert) {
        warn!("Alert [{}] {}: {}", alert.severity, alert.title, alert.description);

        {
            let mut storage = self.storage.write();
            storage.stats.total_alerts += 1;
            *storage
                .stats
                .alerts_by_severity
                .entry(alert.severity.to_string())
                .or_insert(0) += 1;
            storage.stats.last_alert = Some(alert.timestamp);

            storage.history.push_back(alert.clone());
            if storage.history.len() > MAX_ALERTS {
                storage.history.pop_front();
            }
        }

        let channels = self.notification_channels.read().await;
        for channel in channels.iter() {
            if !channel.supports_severity(alert.severity) {
                continue;
            }
            if let Err(e) = channel.send(&alert).await {
                error!("Failed to deliver alert {} via {}: {}", alert.id, channel.name(), e);
                self.storage.write().stats.failed_notifications += 1;
            }
        }
    }

    /// Mark an alert as acknowledged. Returns false for unknown or already acknowledged ids.
    pub fn acknowledge(&self, alert_id: &str) -> bool {
        let mut storage = self.storage.write();
        let Some(alert) = storage
            .history
            .iter_mut()
            .find(|a| a.id == alert_id && !a.acknowledged)
        else {
            return false;
        };
        alert.acknowledged = true;
        storage.stats.acknowledged += 1;
        debug!("Acknowledged alert {}", alert_id);
        true
    }

    /// Most recent alerts first
    pub fn get_history(&self, limit: Option<usize>) -> Vec<Alert> {
        let storage = self.storage.read();
        storage
            .history
            .iter()
            .rev()
            .take(limit.unwrap_or(MAX_ALERTS))
            .cloned()
            .collect()
    }

    pub fn unacknowledged(&self) -> Vec<Alert> {
        self.storage
            .read()
            .history
            .iter()
            .filter(|a| !a.acknowledged)
            .cloned()
            .collect()
    }

    pub fn get_stats(&self) -> AlertStats {
        self.storage.read().stats.clone()
    }
}
