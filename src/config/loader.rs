//! Configuration loading from environment variables and override files

use super::models::*;
use super::Config;
use crate::utils::error::{CdnError, Result};
use crate::utils::parse_bool;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Default override file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cdn.config.yaml";

impl DeploymentConfig {
    /// Load deployment settings from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(provider) = env::var("CDN_PROVIDER") {
            config.provider = provider.trim().to_lowercase();
        }
        if let Ok(domain) = env::var("DOMAIN") {
            config.domain = domain;
        }
        config.origin = env::var("ORIGIN_URL").ok();
        config.dry_run = env_flag("DRY_RUN");
        config.force = env_flag("FORCE_DEPLOY");
        if let Ok(command) = env::var("BUILD_COMMAND") {
            config.build_command = command;
        }
        if let Ok(dir) = env::var("BUILD_DIR") {
            config.build_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("REPORT_DIR") {
            config.report_dir = PathBuf::from(dir);
        }
        config.webhook_url = env::var("WEBHOOK_URL").ok();
        config.fallback.provider = env::var("FALLBACK_PROVIDER")
            .ok()
            .map(|p| p.trim().to_lowercase());
        config.fallback.local_path = env::var("FALLBACK_PATH").ok().map(PathBuf::from);
        config.fallback.origin = env::var("FALLBACK_ORIGIN_URL").ok();

        Ok(config)
    }
}

impl SecurityScanConfig {
    /// Load scanner settings from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(enabled) = env::var("ENABLE_SECURITY_SCAN") {
            config.enabled = parse_bool(&enabled);
        }
        if let Some(threshold) = env_parse::<f64>("SECURITY_THRESHOLD")? {
            config.threshold = threshold;
        }

        Ok(config)
    }
}

impl MonitoringConfig {
    /// Load monitor settings from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(enabled) = env::var("ENABLE_PERFORMANCE_TEST") {
            config.performance_test_enabled = parse_bool(&enabled);
        }
        config.monitoring_enabled = env_flag("ENABLE_MONITORING");
        if let Some(interval) = env_parse::<u64>("MONITORING_INTERVAL_MS")? {
            config.interval_ms = interval;
        }
        if let Some(duration) = env_parse::<u64>("MONITORING_DURATION_SECS")? {
            config.duration_secs = duration;
        }
        if let Some(value) = env_parse::<f64>("RESPONSE_TIME_THRESHOLD_MS")? {
            config.thresholds.response_time_ms = value;
        }
        if let Some(value) = env_parse::<f64>("AVAILABILITY_THRESHOLD")? {
            config.thresholds.availability = value;
        }
        if let Some(value) = env_parse::<f64>("ERROR_RATE_THRESHOLD")? {
            config.thresholds.error_rate = value;
        }
        if let Ok(dir) = env::var("METRICS_DIR") {
            config.metrics_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let _ = dotenvy::dotenv();

        Ok(Self {
            deployment: DeploymentConfig::from_env()?,
            policy: PolicyConfig::default(),
            security: SecurityScanConfig::from_env()?,
            monitoring: MonitoringConfig::from_env()?,
            providers: ProviderSettings::from_env(),
        })
    }

    /// Load environment configuration and apply the override file on top
    ///
    /// The file is `path` when given, else `CDN_CONFIG`, else
    /// `cdn.config.yaml` when it exists. An explicitly named file that
    /// does not exist is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let base = Self::from_env()?;

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var("CDN_CONFIG").ok().map(PathBuf::from));
        let candidate = match explicit {
            Some(path) => Some(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let config = match candidate {
            Some(path) => {
                let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    CdnError::config(format!("Failed to read config file {:?}: {}", path, e))
                })?;
                info!("Applying configuration overrides from {:?}", path);
                base.merge_yaml(&content)?
            }
            None => base,
        };

        debug!(
            provider = %config.deployment.provider,
            domain = %config.deployment.domain,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Deep-merge a YAML document over this configuration (file wins)
    pub fn merge_yaml(self, yaml: &str) -> Result<Self> {
        let overlay: serde_json::Value = serde_yaml::from_str(yaml)?;
        if overlay.is_null() {
            return Ok(self);
        }
        let mut base = serde_json::to_value(&self)?;
        merge_json_values(&mut base, &overlay);
        serde_json::from_value(base)
            .map_err(|e| CdnError::config(format!("Invalid configuration override: {}", e)))
    }
}

/// Recursively merge `overlay` into `base`; non-object values replace
pub fn merge_json_values(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|v| parse_bool(&v)).unwrap_or(false)
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CdnError::config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}
