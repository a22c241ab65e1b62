//! Deployment configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deployment target and pipeline switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Active provider name (exactly one at a time)
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Public domain served by the CDN
    #[serde(default)]
    pub domain: String,
    /// Origin URL the CDN pulls from
    #[serde(default)]
    pub origin: Option<String>,
    /// Skip every network call and return the would-be configuration
    #[serde(default)]
    pub dry_run: bool,
    /// Deploy even when validation or the security threshold fails
    #[serde(default)]
    pub force: bool,
    /// Command producing the static bundle
    #[serde(default = "default_build_command")]
    pub build_command: String,
    /// Directory the build must produce
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    /// Directory receiving generated provider files (netlify.toml, vercel.json)
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    /// Directory receiving JSON reports
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Fallback policy
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// Webhook receiving completion/failure and alert notifications
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            domain: String::new(),
            origin: None,
            dry_run: false,
            force: false,
            build_command: default_build_command(),
            build_dir: default_build_dir(),
            working_dir: default_working_dir(),
            report_dir: default_report_dir(),
            fallback: FallbackPolicy::default(),
            webhook_url: None,
        }
    }
}

/// Secondary provider and local filesystem fallback
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackPolicy {
    /// Secondary provider name
    #[serde(default)]
    pub provider: Option<String>,
    /// Local path served when every CDN is unavailable
    #[serde(default)]
    pub local_path: Option<PathBuf>,
    /// Origin used by generated edge code when the primary origin fails
    #[serde(default)]
    pub origin: Option<String>,
}
