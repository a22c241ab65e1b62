//! Configuration management
//!
//! Settings come from environment variables (with `.env` support) and an
//! optional YAML override file whose values take precedence.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{DEFAULT_CONFIG_FILE, merge_json_values};
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{CdnError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete deployment tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Deployment target and pipeline switches
    #[serde(default)]
    pub deployment: DeploymentConfig,
    /// Provider-agnostic edge policy
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Security scanner settings
    #[serde(default)]
    pub security: SecurityScanConfig,
    /// Performance monitor settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Vendor credentials and endpoints
    #[serde(default)]
    pub providers: ProviderSettings,
}

impl Config {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.deployment
            .validate()
            .map_err(|e| CdnError::Validation(format!("Deployment config error: {}", e)))?;
        self.policy
            .validate()
            .map_err(|e| CdnError::Validation(format!("Policy config error: {}", e)))?;
        self.security
            .validate()
            .map_err(|e| CdnError::Validation(format!("Security config error: {}", e)))?;
        self.monitoring
            .validate()
            .map_err(|e| CdnError::Validation(format!("Monitoring config error: {}", e)))?;

        Ok(())
    }

    /// Base URL of the deployed site
    pub fn site_url(&self) -> String {
        let domain = self.deployment.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_merge_yaml_overrides_nested_values() {
        let base = Config {
            deployment: DeploymentConfig {
                domain: "env.example.com".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base
            .merge_yaml(
                r#"
deployment:
  provider: fastly
security:
  threshold: 65
policy:
  csp:
    script-src: ["'self'", "https://cdn.example.com"]
"#,
            )
            .unwrap();

        assert_eq!(merged.deployment.provider, "fastly");
        assert_eq!(merged.deployment.domain, "env.example.com");
        assert_eq!(merged.security.threshold, 65.0);
        assert_eq!(merged.security.max_redirect_depth, 10);
        assert_eq!(
            merged.policy.csp.get("script-src").unwrap(),
            &vec!["'self'".to_string(), "https://cdn.example.com".to_string()]
        );
        assert!(merged.policy.csp.contains_key("default-src"));
    }

    #[test]
    fn test_merge_yaml_empty_document() {
        let merged = Config::default().merge_yaml("").unwrap();
        assert_eq!(merged.deployment.provider, "cloudflare");
    }

    #[test]
    fn test_merge_yaml_rejects_wrong_types() {
        let err = Config::default()
            .merge_yaml("security:\n  threshold: high\n")
            .unwrap_err();
        assert!(matches!(err, CdnError::Config(_)));
    }

    #[tokio::test]
    async fn test_load_with_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "deployment:\n  domain: file.example.com\n  provider: netlify"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).await.unwrap();
        assert_eq!(config.deployment.domain, "file.example.com");
        assert_eq!(config.deployment.provider, "netlify");
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file_fails() {
        let result = Config::load(Some(std::path::Path::new("/nonexistent/cdn.yaml"))).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_domain() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(CdnError::Validation(_))));

        let mut config = Config::default();
        config.deployment.domain = "example.com".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.site_url(), "https://example.com");
    }

    #[test]
    fn test_merge_json_values() {
        let mut base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": [1]});
        merge_json_values(&mut base, &serde_json::json!({"a": {"b": 5}, "d": [2, 3]}));
        assert_eq!(base, serde_json::json!({"a": {"b": 5, "c": 2}, "d": [2, 3]}));
    }
}
