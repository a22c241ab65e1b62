//! Monitoring state: bounded metric series, threshold alerts and webhook delivery
//!
//! The performance monitor owns one [`MetricsStore`](metrics::MetricsStore) and
//! one [`AlertManager`](alerts::AlertManager) and feeds both once per cycle.

pub mod alerts;
pub mod metrics;
mod types;

pub use alerts::{AlertManager, AlertStats, NotificationChannel, WebhookChannel};
pub use metrics::{MetricSample, MetricsSnapshot, MetricsStore};
pub use types::{Alert, AlertKind, AlertSeverity};
