//! Tests for metrics module

use super::helpers::{calculate_average, calculate_percentile, sorted};
use super::retention::{METRICS_FILE_PREFIX, prune_older_than, write_snapshot};
use super::{MAX_METRIC_SAMPLES, MetricSample, MetricsStore};
use std::time::Duration;

fn sample(response_time_ms: f64) -> MetricSample {
    MetricSample {
        timestamp: chrono::Utc::now(),
        response_time_ms,
        availability: 100.0,
        error_rate: 0.0,
        cache_hit_ratio: None,
    }
}

#[test]
fn test_nearest_rank_percentile() {
    let values: Vec<f64> = (1..=20).map(f64::from).collect();
    // ceil(0.95 * 20) - 1 = 18
    assert_eq!(calculate_percentile(&values, 95.0), 19.0);
    // ceil(0.99 * 20) - 1 = 19
    assert_eq!(calculate_percentile(&values, 99.0), 20.0);
    assert_eq!(calculate_percentile(&values, 50.0), 10.0);
    assert_eq!(calculate_percentile(&[7.0], 99.0), 7.0);
    assert_eq!(calculate_percentile(&[], 95.0), 0.0);
    assert_eq!(calculate_percentile(&values, 0.0), 1.0);
}

#[test]
fn test_average_and_sort() {
    assert_eq!(calculate_average(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0);
    assert_eq!(calculate_average(&[]), 0.0);
    assert_eq!(sorted(&[3.0, 1.0, 2.0]), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_store_is_fifo_bounded() {
    let store = MetricsStore::new();
    for i in 0..(MAX_METRIC_SAMPLES + 5) {
        store.record(sample(i as f64));
    }
    assert_eq!(store.len(), MAX_METRIC_SAMPLES);
    assert_eq!(store.samples()[0].response_time_ms, 5.0);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.samples, MAX_METRIC_SAMPLES);
    assert_eq!(snapshot.last.unwrap().response_time_ms, (MAX_METRIC_SAMPLES + 4) as f64);
}

#[test]
fn test_empty_snapshot() {
    let snapshot = MetricsStore::new().snapshot();
    assert_eq!(snapshot.samples, 0);
    assert!(snapshot.last.is_none());
}

#[tokio::test]
async fn test_snapshot_files_are_pruned_by_age() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), &sample(10.0)).await.unwrap();
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(METRICS_FILE_PREFIX)
    );
    tokio::fs::write(dir.path().join("unrelated.json"), "{}").await.unwrap();

    // fresh files survive a 24h window
    assert_eq!(prune_older_than(dir.path(), Duration::from_secs(86_400)).await.unwrap(), 0);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(prune_older_than(dir.path(), Duration::from_millis(1)).await.unwrap(), 1);
    assert!(!path.exists());
    assert!(dir.path().join("unrelated.json").exists());
}

#[tokio::test]
async fn test_prune_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert_eq!(prune_older_than(&missing, Duration::from_secs(1)).await.unwrap(), 0);
}
