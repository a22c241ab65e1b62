//! Performance test and monitoring configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Performance monitor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Run the performance test stage
    #[serde(default = "default_true")]
    pub performance_test_enabled: bool,
    /// Run the bounded monitoring stage after deploy
    #[serde(default)]
    pub monitoring_enabled: bool,
    /// Interval between monitoring cycles
    #[serde(default = "default_monitoring_interval_ms")]
    pub interval_ms: u64,
    /// How long the deploy pipeline keeps monitoring
    #[serde(default = "default_monitoring_duration_secs")]
    pub duration_secs: u64,
    /// Alert thresholds
    #[serde(default)]
    pub thresholds: AlertThresholds,
    /// Extra paths probed besides `/`
    #[serde(default = "default_sub_paths")]
    pub sub_paths: Vec<String>,
    /// Simulated regions; empty means the full latency table
    #[serde(default)]
    pub regions: Vec<String>,
    /// Directory receiving per-cycle metric files
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: PathBuf,
    /// Age after which metric files are pruned
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            performance_test_enabled: true,
            monitoring_enabled: false,
            interval_ms: default_monitoring_interval_ms(),
            duration_secs: default_monitoring_duration_secs(),
            thresholds: AlertThresholds::default(),
            sub_paths: default_sub_paths(),
            regions: Vec::new(),
            metrics_dir: default_metrics_dir(),
            retention_hours: default_retention_hours(),
        }
    }
}

/// Threshold breaches that raise alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Average response time above this raises an alert
    #[serde(default = "default_response_time_threshold_ms")]
    pub response_time_ms: f64,
    /// Availability percentage below this raises an alert
    #[serde(default = "default_availability_threshold")]
    pub availability: f64,
    /// Error rate percentage above this raises an alert
    #[serde(default = "default_error_rate_threshold")]
    pub error_rate: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            response_time_ms: default_response_time_threshold_ms(),
            availability: default_availability_threshold(),
            error_rate: default_error_rate_threshold(),
        }
    }
}

fn default_sub_paths() -> Vec<String> {
    vec!["/index.html".to_string()]
}
