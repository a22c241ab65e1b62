//! Security scanner
//!
//! One scanner instance probes one domain. [`SecurityScanner::run_full_scan`]
//! runs every check concurrently and folds the results into a fresh
//! [`ScanReport`]; nothing is carried over between scans.

use super::grade::Grade;
use super::types::{CheckResult, Vulnerability};
use crate::config::SecurityScanConfig;
use crate::utils::error::{CdnError, Result};
use crate::utils::net::client::SCAN_PROBE_TIMEOUT;
use crate::utils::net::{ClientUtils, HttpClientConfig};
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Aggregated result of one full scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub domain: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub checks: Vec<CheckResult>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub recommendations: Vec<String>,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub grade: Grade,
    pub threshold: f64,
    pub passed: bool,
}

impl ScanReport {
    /// Fold check results into a report graded against `threshold`
    pub fn from_checks(domain: &str, threshold: f64, checks: Vec<CheckResult>) -> Self {
        let mut vulnerabilities = Vec::new();
        let mut recommendations = Vec::new();
        let mut score = 0.0;
        let mut max_score = 0.0;

        for check in &checks {
            score += check.score;
            max_score += check.max_score;
            vulnerabilities.extend(check.vulnerabilities.iter().cloned());
            for recommendation in &check.recommendations {
                if !recommendations.contains(recommendation) {
                    recommendations.push(recommendation.clone());
                }
            }
        }

        let percentage = if max_score > 0.0 {
            score / max_score * 100.0
        } else {
            0.0
        };

        Self {
            domain: domain.to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            vulnerabilities,
            recommendations,
            score,
            max_score,
            percentage,
            grade: Grade::from_percentage(percentage),
            threshold,
            passed: percentage >= threshold,
        }
    }

    /// Look up a check by name
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Write the report as `security-scan-<timestamp>.json` under `dir`
    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!(
            "security-scan-{}.json",
            crate::utils::file_timestamp()
        ));
        crate::utils::fs::write_json(&path, self).await?;
        info!("Security report saved to {}", path.display());
        Ok(path)
    }
}

/// HTTP-based security scanner for a single domain
#[derive(Debug, Clone)]
pub struct SecurityScanner {
    pub(crate) domain: String,
    pub(crate) base_url: Url,
    pub(crate) http_url: Url,
    pub(crate) config: SecurityScanConfig,
    /// Follows redirects
    pub(crate) client: Client,
    /// Never follows redirects
    pub(crate) direct: Client,
}

impl SecurityScanner {
    /// Scanner for `domain`, probed at `https://<domain>`
    pub fn new(domain: &str, config: SecurityScanConfig) -> Result<Self> {
        let base_url = ClientUtils::normalize_base_url(domain)?;
        let mut http_url = base_url.clone();
        http_url
            .set_scheme("http")
            .map_err(|_| CdnError::config(format!("Cannot derive http URL for {}", domain)))?;
        Self::build(domain, base_url, http_url, config)
    }

    /// Scanner probing an explicit base URL for both the HTTPS and plain HTTP checks
    pub fn with_base_url(domain: &str, base_url: Url, config: SecurityScanConfig) -> Result<Self> {
        Self::build(domain, base_url.clone(), base_url, config)
    }

    fn build(domain: &str, base_url: Url, http_url: Url, config: SecurityScanConfig) -> Result<Self> {
        let client = ClientUtils::create_http_client(&HttpClientConfig::with_timeout(
            SCAN_PROBE_TIMEOUT,
        ))?;
        let direct = ClientUtils::create_http_client(
            &HttpClientConfig::with_timeout(SCAN_PROBE_TIMEOUT).without_redirects(),
        )?;
        Ok(Self {
            domain: domain.to_string(),
            base_url,
            http_url,
            config,
            client,
            direct,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL
    pub(crate) fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CdnError::config(format!("Invalid probe path {}: {}", path, e)))
    }

    /// Run every check concurrently and grade the result
    pub async fn run_full_scan(&self) -> ScanReport {
        info!("Running security scan for {}", self.domain);

        let (ssl, headers, csp, cache, cors, redirect, disclosure, ddos, rate_limit, compression) = tokio::join!(
            self.check_ssl(),
            self.check_security_headers(),
            self.check_csp(),
            self.check_cache_headers(),
            self.check_cors(),
            self.check_https_redirect(),
            self.check_information_disclosure(),
            self.check_ddos_protection(),
            self.check_rate_limiting(),
            self.check_compression(),
        );

        let checks = vec![
            ssl, headers, csp, cache, cors, redirect, disclosure, ddos, rate_limit, compression,
        ];
        for check in &checks {
            debug!(
                "{}: {:.1}/{:.1} ({})",
                check.name,
                check.score,
                check.max_score,
                if check.passed { "passed" } else { "failed" }
            );
        }

        let report = ScanReport::from_checks(&self.domain, self.config.threshold, checks);
        if report.passed {
            info!(
                "Security scan passed: {:.1}% (grade {})",
                report.percentage, report.grade
            );
        } else {
            warn!(
                "Security scan below threshold: {:.1}% < {:.1}% (grade {})",
                report.percentage, report.threshold, report.grade
            );
        }
        report
    }

    /// Follow redirects from `url` one hop at a time, returning the number of
    /// hops taken. Fails once `depth` reaches `max_depth`, before issuing
    /// another request.
    pub fn check_redirect_loop<'a>(
        &'a self,
        url: Url,
        depth: u32,
        max_depth: u32,
    ) -> BoxFuture<'a, Result<u32>> {
        Box::pin(async move {
            if depth >= max_depth {
                return Err(CdnError::scan(format!(
                    "Redirect loop detected: more than {} redirects from {}",
                    max_depth, self.http_url
                )));
            }

            let response = self.direct.get(url.clone()).send().await?;
            if !is_redirect(response.status()) {
                return Ok(depth);
            }

            let Some(location) = ClientUtils::header_str(response.headers(), "location") else {
                return Ok(depth);
            };
            let next = url
                .join(&location)
                .map_err(|e| CdnError::scan(format!("Invalid redirect target {}: {}", location, e)))?;
            self.check_redirect_loop(next, depth + 1, max_depth).await
        })
    }
}

pub(crate) fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}
