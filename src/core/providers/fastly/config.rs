//! Fastly configuration

use crate::core::providers::shared::{env_opt, resolve_api_base};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.fastly.com";

/// Fastly service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastlyConfig {
    /// API token sent as `Fastly-Key`
    pub api_token: Option<String>,
    pub service_id: Option<String>,
    /// API base URL (defaults to https://api.fastly.com)
    pub api_base: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for FastlyConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            service_id: None,
            api_base: None,
            timeout: default_timeout(),
        }
    }
}

impl FastlyConfig {
    pub fn from_env() -> Self {
        Self {
            api_token: env_opt("FASTLY_API_TOKEN"),
            service_id: env_opt("FASTLY_SERVICE_ID"),
            api_base: env_opt("FASTLY_API_BASE"),
            ..Default::default()
        }
    }

    pub fn get_api_base(&self) -> String {
        resolve_api_base(self.api_base.as_deref(), "FASTLY_API_BASE", DEFAULT_API_BASE)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

fn default_timeout() -> u64 {
    30
}
