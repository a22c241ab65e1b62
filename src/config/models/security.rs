//! Security scan configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Security scanner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScanConfig {
    /// Run the scan as part of the deploy pipeline
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum percentage score for the scan to pass
    #[serde(default = "default_security_threshold")]
    pub threshold: f64,
    /// Redirect-loop detection depth
    #[serde(default = "default_max_redirect_depth")]
    pub max_redirect_depth: u32,
    /// Concurrent requests fired by rate limit detection
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: usize,
    /// Paths probed for information disclosure
    #[serde(default = "default_sensitive_paths")]
    pub sensitive_paths: Vec<String>,
    /// Representative resources per cache class, `(class, path)`
    #[serde(default = "default_cache_probes")]
    pub cache_probes: Vec<CacheProbe>,
}

impl Default for SecurityScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_security_threshold(),
            max_redirect_depth: default_max_redirect_depth(),
            rate_limit_burst: default_rate_limit_burst(),
            sensitive_paths: default_sensitive_paths(),
            cache_probes: default_cache_probes(),
        }
    }
}

/// A resource probed by the cache heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheProbe {
    /// Resource class: `html`, `static` or `api`
    pub class: String,
    pub path: String,
}

fn default_sensitive_paths() -> Vec<String> {
    [
        "/.env",
        "/.git/config",
        "/.git/HEAD",
        "/config.json",
        "/package.json",
        "/.DS_Store",
        "/backup.zip",
        "/wp-config.php",
        "/server-status",
        "/.htaccess",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_cache_probes() -> Vec<CacheProbe> {
    [("html", "/"), ("static", "/favicon.ico"), ("api", "/api/health")]
        .into_iter()
        .map(|(class, path)| CacheProbe {
            class: class.to_string(),
            path: path.to_string(),
        })
        .collect()
}
