//! Data shared by every CDN adapter

use crate::config::models::{CacheRule, OptimizationConfig, TransportSecurityConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Provider-agnostic policy an adapter maps into vendor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePolicy {
    /// Public domain
    pub domain: String,
    /// Origin URL the CDN pulls from
    pub origin: Option<String>,
    /// Origin used by generated edge code when the primary origin fails
    pub fallback_origin: Option<String>,
    /// Security, CORS and CSP headers, merged
    pub headers: BTreeMap<String, String>,
    /// Cache rules in evaluation order
    pub cache_rules: Vec<CacheRule>,
    pub optimization: OptimizationConfig,
    pub transport: TransportSecurityConfig,
}

impl EdgePolicy {
    /// Origin host without scheme, falling back to the public domain
    pub fn origin_host(&self) -> String {
        self.origin
            .as_deref()
            .and_then(|o| url::Url::parse(o).ok())
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.domain.clone())
    }
}

/// Local project layout used by adapters that write files into the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLayout {
    /// Directory receiving generated files
    pub working_dir: PathBuf,
    /// Command that builds the site
    pub build_command: String,
    /// Build output directory, relative to the working directory
    pub publish_dir: PathBuf,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            build_command: "npm run build".to_string(),
            publish_dir: PathBuf::from("dist"),
        }
    }
}

/// File produced alongside a vendor payload (worker script, toml, json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub file_name: String,
    pub contents: String,
}

/// Vendor-specific configuration generated from an [`EdgePolicy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    /// JSON payload sent to the vendor API
    pub payload: serde_json::Value,
    /// Files generated alongside the payload
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<GeneratedArtifact>,
}

impl ProviderConfig {
    pub fn new(provider: &str, payload: serde_json::Value) -> Self {
        Self {
            provider: provider.to_string(),
            payload,
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, file_name: &str, contents: String) -> Self {
        self.artifacts.push(GeneratedArtifact {
            file_name: file_name.to_string(),
            contents,
        });
        self
    }

    /// Find a generated artifact by file name
    pub fn artifact(&self, file_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }
}

/// Outcome of credential and connectivity validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    /// Record an error, invalidating the report
    pub fn error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record an error when a required credential is absent; returns whether it is present
    ///
    /// A missing credential invalidates the report; `DeployOptions::force` is the override.
    pub fn require(&mut self, name: &str, value: Option<&str>) -> bool {
        match value {
            Some(v) if !v.trim().is_empty() => true,
            _ => {
                self.error(format!("{} is not set", name));
                false
            }
        }
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Successful deployment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentOutcome {
    pub provider: String,
    pub deployment_id: Option<String>,
    pub url: Option<String>,
    /// Vendor-specific details
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DeploymentOutcome {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            deployment_id: None,
            url: None,
            metadata: serde_json::Value::Null,
        }
    }
}

/// Health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_available(&self) -> bool {
        !matches!(self, HealthStatus::Unhealthy)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        };
        f.write_str(s)
    }
}

/// Result of a single health probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub provider: String,
    pub status: HealthStatus,
    pub response_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Read-only vendor status snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSnapshot {
    pub provider: String,
    pub status: String,
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_report_require() {
        let mut report = ValidationReport::new();
        assert!(report.require("TOKEN", Some("abc")));
        assert!(report.valid);

        assert!(!report.require("ZONE_ID", None));
        assert!(!report.require("SITE_ID", Some("  ")));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["ZONE_ID is not set", "SITE_ID is not set"]);
    }

    #[test]
    fn test_validation_report_merge() {
        let mut a = ValidationReport::new();
        a.warning("slow");
        let mut b = ValidationReport::new();
        b.error("broken");
        a.merge(b);
        assert!(!a.valid);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.warnings.len(), 1);
    }

    #[test]
    fn test_origin_host() {
        let policy = EdgePolicy {
            domain: "www.example.com".to_string(),
            origin: Some("https://origin.example.com:8443/app".to_string()),
            fallback_origin: None,
            headers: BTreeMap::new(),
            cache_rules: Vec::new(),
            optimization: OptimizationConfig::default(),
            transport: TransportSecurityConfig::default(),
        };
        assert_eq!(policy.origin_host(), "origin.example.com");

        let policy = EdgePolicy {
            origin: None,
            ..policy
        };
        assert_eq!(policy.origin_host(), "www.example.com");
    }
}
