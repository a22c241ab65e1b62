//! Provider-agnostic edge policy configuration: headers, CSP, CORS, caching

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header, cache and security policy applied to every provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Static security headers
    #[serde(default = "default_security_headers")]
    pub security_headers: BTreeMap<String, String>,
    /// CORS policy
    #[serde(default)]
    pub cors: CorsConfig,
    /// CSP directives, directive name to source list
    #[serde(default = "default_csp_directives")]
    pub csp: BTreeMap<String, Vec<String>>,
    /// Cache rules, evaluated in order
    #[serde(default = "default_cache_rules")]
    pub cache_rules: Vec<CacheRule>,
    /// Optimization switches
    #[serde(default)]
    pub optimization: OptimizationConfig,
    /// Transport security switches
    #[serde(default)]
    pub transport: TransportSecurityConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            security_headers: default_security_headers(),
            cors: CorsConfig::default(),
            csp: default_csp_directives(),
            cache_rules: default_cache_rules(),
            optimization: OptimizationConfig::default(),
            transport: TransportSecurityConfig::default(),
        }
    }
}

/// CORS policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Allowed origin; `None` means the deployment domain itself
    #[serde(default)]
    pub allow_origin: Option<String>,
    #[serde(default = "default_cors_methods")]
    pub allow_methods: Vec<String>,
    #[serde(default = "default_cors_headers")]
    pub allow_headers: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_origin: None,
            allow_methods: default_cors_methods(),
            allow_headers: default_cors_headers(),
            max_age: default_cors_max_age(),
        }
    }
}

/// One cache rule keyed by a path glob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRule {
    /// Path glob, e.g. `/assets/*` or `*.html`
    pub pattern: String,
    /// Edge TTL in seconds
    #[serde(default)]
    pub edge_ttl: u64,
    /// Browser TTL in seconds
    #[serde(default)]
    pub browser_ttl: u64,
    /// Content is fingerprinted and never changes
    #[serde(default)]
    pub immutable: bool,
    /// Never cache
    #[serde(default)]
    pub bypass: bool,
}

impl CacheRule {
    /// Construct a caching rule
    pub fn new(pattern: &str, edge_ttl: u64, browser_ttl: u64) -> Self {
        Self {
            pattern: pattern.to_string(),
            edge_ttl,
            browser_ttl,
            immutable: false,
            bypass: false,
        }
    }

    /// Cache-Control value this rule implies
    pub fn cache_control(&self) -> String {
        if self.bypass {
            return "no-store".to_string();
        }
        if self.browser_ttl == 0 {
            return "public, max-age=0, must-revalidate".to_string();
        }
        let mut value = format!("public, max-age={}", self.browser_ttl);
        if self.edge_ttl != self.browser_ttl {
            value.push_str(&format!(", s-maxage={}", self.edge_ttl));
        }
        if self.immutable {
            value.push_str(", immutable");
        }
        value
    }

    /// Whether `path` matches this rule's glob (single `*` wildcard, anchored)
    pub fn matches(&self, path: &str) -> bool {
        match self.pattern.split_once('*') {
            None => self.pattern == path,
            Some((prefix, suffix)) => {
                path.len() >= prefix.len() + suffix.len()
                    && path.starts_with(prefix)
                    && path.ends_with(suffix)
            }
        }
    }
}

/// Optimization switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    #[serde(default = "default_true")]
    pub minify: bool,
    #[serde(default = "default_true")]
    pub brotli: bool,
    #[serde(default = "default_true")]
    pub http2: bool,
    #[serde(default = "default_true")]
    pub http3: bool,
    #[serde(default)]
    pub image_optimization: bool,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            minify: true,
            brotli: true,
            http2: true,
            http3: true,
            image_optimization: false,
        }
    }
}

/// Transport security switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportSecurityConfig {
    #[serde(default = "default_true")]
    pub always_use_https: bool,
    #[serde(default = "default_min_tls_version")]
    pub min_tls_version: String,
    #[serde(default = "default_hsts_max_age")]
    pub hsts_max_age: u64,
    #[serde(default = "default_true")]
    pub waf: bool,
}

impl Default for TransportSecurityConfig {
    fn default() -> Self {
        Self {
            always_use_https: true,
            min_tls_version: default_min_tls_version(),
            hsts_max_age: default_hsts_max_age(),
            waf: true,
        }
    }
}

fn default_security_headers() -> BTreeMap<String, String> {
    [
        ("X-Content-Type-Options", "nosniff"),
        ("X-Frame-Options", "DENY"),
        ("X-XSS-Protection", "1; mode=block"),
        ("Referrer-Policy", "strict-origin-when-cross-origin"),
        (
            "Permissions-Policy",
            "camera=(), microphone=(), geolocation=()",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_csp_directives() -> BTreeMap<String, Vec<String>> {
    [
        ("default-src", vec!["'self'"]),
        ("script-src", vec!["'self'"]),
        ("style-src", vec!["'self'", "'unsafe-inline'"]),
        ("img-src", vec!["'self'", "data:", "https:"]),
        ("font-src", vec!["'self'", "data:"]),
        ("connect-src", vec!["'self'", "https:"]),
        ("frame-ancestors", vec!["'none'"]),
        ("object-src", vec!["'none'"]),
        ("base-uri", vec!["'self'"]),
        ("form-action", vec!["'self'"]),
        ("upgrade-insecure-requests", vec![]),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
    .collect()
}

fn default_cache_rules() -> Vec<CacheRule> {
    vec![
        CacheRule {
            immutable: true,
            ..CacheRule::new("/assets/*", 31_536_000, 31_536_000)
        },
        CacheRule {
            immutable: true,
            ..CacheRule::new("/static/*", 31_536_000, 31_536_000)
        },
        CacheRule::new("*.html", 300, 0),
        CacheRule {
            bypass: true,
            ..CacheRule::new("/api/*", 0, 0)
        },
    ]
}

fn default_cors_methods() -> Vec<String> {
    vec!["GET".into(), "HEAD".into(), "OPTIONS".into()]
}

fn default_cors_headers() -> Vec<String> {
    vec!["Content-Type".into(), "Authorization".into()]
}

fn default_cors_max_age() -> u64 {
    86_400
}
