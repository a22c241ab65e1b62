use super::{DDOS_MAX, DISCLOSURE_MAX, RATE_LIMIT_MAX};
use crate::core::security::scanner::SecurityScanner;
use crate::core::security::types::{CheckResult, Severity};
use crate::utils::net::ClientUtils;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use serde_json::json;

static VERSIONED_SERVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d").expect("Invalid server version regex"));

/// Headers that reveal the serving stack
const LEAKY_HEADERS: [&str; 4] = [
    "x-powered-by",
    "x-aspnet-version",
    "x-aspnetmvc-version",
    "x-generator",
];

/// Header fingerprints, checked in order
const CDN_FINGERPRINTS: [(&str, &str); 6] = [
    ("cf-ray", "cloudflare"),
    ("x-amz-cf-id", "cloudfront"),
    ("x-fastly-request-id", "fastly"),
    ("x-nf-request-id", "netlify"),
    ("x-vercel-id", "vercel"),
    ("x-served-by", "fastly"),
];

const CACHE_STATUS_HEADERS: [&str; 4] = ["cf-cache-status", "x-cache", "x-vercel-cache", "age"];

const RATE_LIMIT_HEADERS: [&str; 5] = [
    "x-ratelimit-limit",
    "x-rate-limit-limit",
    "ratelimit-limit",
    "ratelimit-policy",
    "retry-after",
];

/// Identify the CDN in front of a response from its headers
pub fn detect_cdn(headers: &HeaderMap) -> Option<&'static str> {
    if let Some((_, cdn)) = CDN_FINGERPRINTS
        .iter()
        .find(|(header, _)| headers.contains_key(*header))
    {
        return Some(cdn);
    }

    let server = ClientUtils::header_str(headers, "server")
        .unwrap_or_default()
        .to_ascii_lowercase();
    let via = ClientUtils::header_str(headers, "via")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if server.contains("cloudflare") {
        Some("cloudflare")
    } else if server.contains("netlify") {
        Some("netlify")
    } else if server.contains("vercel") {
        Some("vercel")
    } else if via.contains("cloudfront") {
        Some("cloudfront")
    } else if via.contains("varnish") {
        Some("fastly")
    } else if !via.is_empty() {
        Some("unknown")
    } else {
        None
    }
}

impl SecurityScanner {
    /// Sensitive file exposure and stack-revealing headers
    pub async fn check_information_disclosure(&self) -> CheckResult {
        let mut result = CheckResult::new("disclosure", DISCLOSURE_MAX);

        let probes = self.config.sensitive_paths.iter().map(|path| async move {
            let url = self.url_for(path).ok()?;
            let response = self.direct.get(url).send().await.ok()?;
            let status = response.status();
            let html = ClientUtils::is_html(
                ClientUtils::header_str(response.headers(), "content-type").as_deref(),
            );
            Some((path.clone(), status, html))
        });

        let mut exposed = Vec::new();
        for (path, status, html) in join_all(probes).await.into_iter().flatten() {
            // SPA fallbacks answer every path with the HTML shell
            if status.is_success() && !html {
                exposed.push(path);
            }
        }

        let mut path_score: f64 = 6.0;
        for path in &exposed {
            path_score -= 2.0;
            let severity = if path.contains(".env") || path.contains(".git") {
                Severity::Critical
            } else {
                Severity::High
            };
            result.vulnerability(
                "sensitive-file-exposed",
                format!("Sensitive path is publicly readable: {}", path),
                severity,
            );
        }
        if !exposed.is_empty() {
            result.recommend("Block access to dotfiles, VCS metadata and backups at the edge");
        }
        result.award(path_score.max(0.0));

        let mut leaked = Vec::new();
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => {
                let headers = response.headers();
                if let Some(server) = ClientUtils::header_str(headers, "server") {
                    if VERSIONED_SERVER.is_match(&server) {
                        leaked.push(format!("server: {}", server));
                    }
                }
                for name in LEAKY_HEADERS {
                    if let Some(value) = ClientUtils::header_str(headers, name) {
                        leaked.push(format!("{}: {}", name, value));
                    }
                }
                for leak in &leaked {
                    result.vulnerability(
                        "header-disclosure",
                        format!("Response header discloses stack details ({})", leak),
                        Severity::Low,
                    );
                }
                if !leaked.is_empty() {
                    result.recommend("Strip version and framework headers from responses");
                }
                result.award((4.0 - 2.0 * leaked.len() as f64).max(0.0));
            }
            Err(e) => result.vulnerability(
                "disclosure-unreachable",
                format!("Could not fetch home page: {}", e),
                Severity::Medium,
            ),
        }

        result.finish(json!({"exposed_paths": exposed, "leaky_headers": leaked}))
    }

    /// CDN fingerprinting as a proxy for DDoS absorption
    pub async fn check_ddos_protection(&self) -> CheckResult {
        let response = match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return CheckResult::errored("ddos", DDOS_MAX, "ddos-unreachable", e),
        };
        let mut result = CheckResult::new("ddos", DDOS_MAX);
        let headers = response.headers();

        let cdn = detect_cdn(headers);
        let edge_cached = CACHE_STATUS_HEADERS.iter().any(|h| headers.contains_key(*h));
        match cdn {
            Some(_) => result.award(3.0),
            None => {
                result.vulnerability(
                    "no-cdn-detected",
                    "No CDN or DDoS mitigation layer detected in front of the origin",
                    Severity::Medium,
                );
                result.recommend("Serve traffic through a CDN with DDoS mitigation");
            }
        }
        if edge_cached {
            result.award(2.0);
        }

        result.finish(json!({"cdn": cdn, "edge_cache_headers": edge_cached}))
    }

    /// Fire a burst of concurrent requests and look for throttling signals
    pub async fn check_rate_limiting(&self) -> CheckResult {
        let burst = self.config.rate_limit_burst;
        let requests = (0..burst).map(|_| self.client.get(self.base_url.clone()).send());
        let responses: Vec<_> = join_all(requests).await.into_iter().flatten().collect();

        if responses.is_empty() {
            return CheckResult::errored(
                "rate-limit",
                RATE_LIMIT_MAX,
                "rate-limit-unreachable",
                "no request in the burst succeeded",
            );
        }

        let mut result = CheckResult::new("rate-limit", RATE_LIMIT_MAX);
        let throttled = responses
            .iter()
            .filter(|r| matches!(r.status().as_u16(), 429 | 503))
            .count();
        let advertised = responses.iter().any(|r| {
            RATE_LIMIT_HEADERS
                .iter()
                .any(|h| r.headers().contains_key(*h))
        });

        if throttled > 0 {
            result.award(RATE_LIMIT_MAX);
        } else if advertised {
            result.award(3.0);
        } else {
            result.vulnerability(
                "no-rate-limiting",
                format!("{} concurrent requests were served without throttling", burst),
                Severity::Low,
            );
            result.recommend("Configure rate limiting rules at the CDN edge");
        }

        result.finish(json!({
            "requests": burst,
            "completed": responses.len(),
            "throttled": throttled,
            "rate_limit_headers": advertised,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_detect_cdn_from_fingerprints() {
        assert_eq!(detect_cdn(&headers(&[("cf-ray", "abc-LHR")])), Some("cloudflare"));
        assert_eq!(detect_cdn(&headers(&[("x-amz-cf-id", "x")])), Some("cloudfront"));
        assert_eq!(detect_cdn(&headers(&[("x-served-by", "cache-lhr")])), Some("fastly"));
        assert_eq!(detect_cdn(&headers(&[("x-nf-request-id", "1")])), Some("netlify"));
        assert_eq!(detect_cdn(&headers(&[("x-vercel-id", "fra1")])), Some("vercel"));
    }

    #[test]
    fn test_detect_cdn_from_server_and_via() {
        assert_eq!(detect_cdn(&headers(&[("server", "cloudflare")])), Some("cloudflare"));
        assert_eq!(
            detect_cdn(&headers(&[("via", "1.1 abc.cloudfront.net (CloudFront)")])),
            Some("cloudfront")
        );
        assert_eq!(detect_cdn(&headers(&[("via", "1.1 proxy")])), Some("unknown"));
        assert_eq!(detect_cdn(&headers(&[("server", "nginx")])), None);
    }

    #[test]
    fn test_versioned_server_pattern() {
        assert!(VERSIONED_SERVER.is_match("nginx/1.25.3"));
        assert!(!VERSIONED_SERVER.is_match("cloudflare"));
    }
}
