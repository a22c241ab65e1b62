//! Simulated regional probing
//!
//! Requests are issued from this host; the per-region latency is injected
//! from a static table, not measured.

use super::types::RegionalResult;
use crate::utils::net::tls::elapsed_ms;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::warn;
use url::Url;

/// Region name and injected latency in milliseconds
pub const REGIONS: [(&str, u64); 7] = [
    ("us-east", 20),
    ("us-west", 60),
    ("eu-west", 90),
    ("eu-central", 100),
    ("ap-southeast", 180),
    ("ap-northeast", 160),
    ("sa-east", 140),
];

/// Regions to probe: all of them for an empty list, else the named ones
pub fn select_regions(names: &[String]) -> Vec<(&'static str, u64)> {
    if names.is_empty() {
        return REGIONS.to_vec();
    }
    names
        .iter()
        .filter_map(|name| {
            let found = REGIONS.iter().find(|(region, _)| *region == name.as_str()).copied();
            if found.is_none() {
                warn!("Unknown region '{}' ignored", name);
            }
            found
        })
        .collect()
}

/// Sleep for the region's latency, then time a GET of `url`
pub async fn simulate_region(
    client: &Client,
    url: &Url,
    region: &str,
    latency_ms: u64,
) -> RegionalResult {
    tokio::time::sleep(Duration::from_millis(latency_ms)).await;

    let start = Instant::now();
    let (status, error) = match client.get(url.clone()).send().await {
        Ok(response) => (Some(response.status().as_u16()), None),
        Err(e) => (None, Some(e.to_string())),
    };

    RegionalResult {
        region: region.to_string(),
        simulated_latency_ms: latency_ms,
        response_time_ms: latency_ms as f64 + elapsed_ms(start),
        status,
        error,
    }
}
