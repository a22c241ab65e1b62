//! Type definitions for monitoring alerts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "info"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Which threshold an alert was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ResponseTime,
    Availability,
    ErrorRate,
}

/// A threshold breach observed during monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    /// Observed value
    pub value: f64,
    /// Configured threshold
    pub threshold: f64,
    /// Domain being monitored
    pub source: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub acknowledged: bool,
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        severity: AlertSeverity,
        source: &str,
        value: f64,
        threshold: f64,
    ) -> Self {
        let (title, description) = match kind {
            AlertKind::ResponseTime => (
                "High response time",
                format!(
                    "Average response time {:.0}ms exceeds {:.0}ms",
                    value, threshold
                ),
            ),
            AlertKind::Availability => (
                "Low availability",
                format!("Availability {:.2}% is below {:.2}%", value, threshold),
            ),
            AlertKind::ErrorRate => (
                "High error rate",
                format!("Error rate {:.2}% exceeds {:.2}%", value, threshold),
            ),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            severity,
            title: title.to_string(),
            description,
            value,
            threshold,
            source: source.to_string(),
            timestamp: chrono::Utc::now(),
            acknowledged: false,
        }
    }
}
