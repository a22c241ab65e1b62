//! Aggregation of probe results

use super::types::PerformanceStats;
use crate::monitoring::metrics::helpers::sorted;
use crate::monitoring::metrics::{calculate_average, calculate_percentile};
use crate::utils::net::ClientUtils;
use reqwest::header::HeaderMap;

impl PerformanceStats {
    /// avg/min/max and nearest-rank p95/p99 over response times
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let ordered = sorted(samples);
        Self {
            samples: ordered.len(),
            avg_ms: calculate_average(&ordered),
            min_ms: ordered[0],
            max_ms: ordered[ordered.len() - 1],
            p95_ms: calculate_percentile(&ordered, 95.0),
            p99_ms: calculate_percentile(&ordered, 99.0),
        }
    }
}

/// Outcome of a single request for availability accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RequestOutcome {
    pub status: Option<u16>,
}

impl RequestOutcome {
    pub fn available(&self) -> bool {
        matches!(self.status, Some(s) if s < 500)
    }

    pub fn errored(&self) -> bool {
        !matches!(self.status, Some(s) if s < 400)
    }
}

/// `(availability, error_rate)` as percentages; no requests means 0% available
pub(crate) fn availability_and_error_rate(outcomes: &[RequestOutcome]) -> (f64, f64) {
    if outcomes.is_empty() {
        return (0.0, 100.0);
    }
    let total = outcomes.len() as f64;
    let available = outcomes.iter().filter(|o| o.available()).count() as f64;
    let errored = outcomes.iter().filter(|o| o.errored()).count() as f64;
    (available / total * 100.0, errored / total * 100.0)
}

/// Classify a response as cache hit or miss from CDN cache headers
pub fn cache_hit(headers: &HeaderMap) -> Option<bool> {
    if let Some(status) = ClientUtils::header_str(headers, "cf-cache-status") {
        return match status.to_ascii_uppercase().as_str() {
            "HIT" | "STALE" | "REVALIDATED" | "UPDATING" => Some(true),
            "MISS" | "EXPIRED" | "BYPASS" | "DYNAMIC" => Some(false),
            _ => None,
        };
    }
    if let Some(status) = ClientUtils::header_str(headers, "x-vercel-cache") {
        return match status.to_ascii_uppercase().as_str() {
            "HIT" | "STALE" | "PRERENDER" => Some(true),
            "MISS" | "BYPASS" => Some(false),
            _ => None,
        };
    }
    if let Some(status) = ClientUtils::header_str(headers, "x-cache") {
        let status = status.to_ascii_uppercase();
        if status.contains("HIT") {
            return Some(true);
        }
        if status.contains("MISS") {
            return Some(false);
        }
    }
    ClientUtils::header_str(headers, "age")
        .and_then(|age| age.trim().parse::<u64>().ok())
        .map(|age| age > 0)
}

/// Hit percentage among classified responses
pub(crate) fn cache_hit_ratio(classified: impl IntoIterator<Item = Option<bool>>) -> Option<f64> {
    let (hits, known) = classified
        .into_iter()
        .flatten()
        .fold((0usize, 0usize), |(hits, known), hit| {
            (hits + usize::from(hit), known + 1)
        });
    (known > 0).then(|| hits as f64 / known as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn test_stats_from_samples() {
        let stats = PerformanceStats::from_samples(&[300.0, 100.0, 200.0, 400.0]);
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.avg_ms, 250.0);
        assert_eq!(stats.min_ms, 100.0);
        assert_eq!(stats.max_ms, 400.0);
        // ceil(0.95 * 4) - 1 = 3
        assert_eq!(stats.p95_ms, 400.0);
        assert_eq!(PerformanceStats::from_samples(&[]), PerformanceStats::default());
    }

    #[test]
    fn test_availability_and_error_rate() {
        let outcomes = [
            RequestOutcome { status: Some(200) },
            RequestOutcome { status: Some(404) },
            RequestOutcome { status: Some(503) },
            RequestOutcome { status: None },
        ];
        let (availability, error_rate) = availability_and_error_rate(&outcomes);
        assert_eq!(availability, 50.0);
        assert_eq!(error_rate, 75.0);
        assert_eq!(availability_and_error_rate(&[]), (0.0, 100.0));
    }

    #[test]
    fn test_cache_hit_classification() {
        assert_eq!(cache_hit(&headers("cf-cache-status", "HIT")), Some(true));
        assert_eq!(cache_hit(&headers("cf-cache-status", "DYNAMIC")), Some(false));
        assert_eq!(cache_hit(&headers("x-vercel-cache", "MISS")), Some(false));
        assert_eq!(cache_hit(&headers("x-cache", "Hit from cloudfront")), Some(true));
        assert_eq!(cache_hit(&headers("age", "120")), Some(true));
        assert_eq!(cache_hit(&headers("age", "0")), Some(false));
        assert_eq!(cache_hit(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cache_hit_ratio() {
        let ratio = cache_hit_ratio([Some(true), Some(false), None, Some(true)]).unwrap();
        assert!((ratio - 66.667).abs() < 0.01);
        assert_eq!(cache_hit_ratio([None, None]), None);
    }
}
