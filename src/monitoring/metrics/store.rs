//! In-memory metric series for one monitored domain

use super::bounded::{BoundedPush, MAX_METRIC_SAMPLES};
use super::helpers::{calculate_average, calculate_percentile, sorted};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// One monitoring cycle's headline numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub response_time_ms: f64,
    pub availability: f64,
    pub error_rate: f64,
    pub cache_hit_ratio: Option<f64>,
}

/// Aggregate view over the retained samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub samples: usize,
    pub avg_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub p99_response_time_ms: f64,
    pub avg_availability: f64,
    pub avg_error_rate: f64,
    pub last: Option<MetricSample>,
}

/// Bounded FIFO series, shared between the monitor task and readers
#[derive(Debug, Clone, Default)]
pub struct MetricsStore {
    samples: Arc<RwLock<VecDeque<MetricSample>>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, sample: MetricSample) {
        self.samples.write().push_bounded(sample, MAX_METRIC_SAMPLES);
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }

    /// Retained samples, oldest first
    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples.read().iter().cloned().collect()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let samples = self.samples.read();
        if samples.is_empty() {
            return MetricsSnapshot::default();
        }

        let response_times: Vec<f64> = samples.iter().map(|s| s.response_time_ms).collect();
        let ordered = sorted(&response_times);
        MetricsSnapshot {
            samples: samples.len(),
            avg_response_time_ms: calculate_average(&response_times),
            p95_response_time_ms: calculate_percentile(&ordered, 95.0),
            p99_response_time_ms: calculate_percentile(&ordered, 99.0),
            avg_availability: calculate_average(samples.iter().map(|s| &s.availability)),
            avg_error_rate: calculate_average(samples.iter().map(|s| &s.error_rate)),
            last: samples.back().cloned(),
        }
    }
}
