//! Metric series, percentile helpers and on-disk retention

mod bounded;
pub mod helpers;
pub mod retention;
mod store;

#[cfg(test)]
mod tests;

pub use bounded::MAX_METRIC_SAMPLES;
pub use helpers::{calculate_average, calculate_percentile};
pub use store::{MetricSample, MetricsSnapshot, MetricsStore};
