//! Performance probe records

use crate::monitoring::Alert;
use serde::{Deserialize, Serialize};

/// Sequential timing breakdown for one URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointTiming {
    pub url: String,
    pub status: Option<u16>,
    pub dns_ms: Option<f64>,
    pub tcp_ms: Option<f64>,
    /// Absent for plain HTTP
    pub tls_ms: Option<f64>,
    /// Time until response headers arrived
    pub ttfb_ms: Option<f64>,
    pub total_ms: Option<f64>,
    pub cache_hit: Option<bool>,
    pub error: Option<String>,
}

impl EndpointTiming {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }
}

/// One simulated regional request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalResult {
    pub region: String,
    /// Injected delay from the static latency table
    pub simulated_latency_ms: u64,
    /// Injected delay plus the measured request time
    pub response_time_ms: f64,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Response-time distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub samples: usize,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

/// Result of one performance check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub domain: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub endpoints: Vec<EndpointTiming>,
    pub regions: Vec<RegionalResult>,
    pub stats: PerformanceStats,
    /// Percentage of requests answered without a 5xx or transport error
    pub availability: f64,
    /// Percentage of requests failing with >= 400 or a transport error
    pub error_rate: f64,
    /// Percentage of cache-classified responses that were hits
    pub cache_hit_ratio: Option<f64>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}
