//! Cloudflare configuration

use crate::core::providers::shared::{env_opt, resolve_api_base};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare zone and worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareConfig {
    /// API token for authentication
    pub api_token: Option<String>,

    /// Zone serving the domain
    pub zone_id: Option<String>,

    /// Account ID; enables edge worker upload when set
    pub account_id: Option<String>,

    /// API base URL (defaults to https://api.cloudflare.com/client/v4)
    pub api_base: Option<String>,

    /// Name of the uploaded worker script
    #[serde(default = "default_worker_name")]
    pub worker_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            zone_id: None,
            account_id: None,
            api_base: None,
            worker_name: default_worker_name(),
            timeout: default_timeout(),
        }
    }
}

impl CloudflareConfig {
    /// Read settings from `CLOUDFLARE_*` environment variables
    pub fn from_env() -> Self {
        Self {
            api_token: env_opt("CLOUDFLARE_API_TOKEN"),
            zone_id: env_opt("CLOUDFLARE_ZONE_ID"),
            account_id: env_opt("CLOUDFLARE_ACCOUNT_ID"),
            api_base: env_opt("CLOUDFLARE_API_BASE"),
            worker_name: env_opt("CLOUDFLARE_WORKER_NAME").unwrap_or_else(default_worker_name),
            ..Default::default()
        }
    }

    /// Get the API base URL
    pub fn get_api_base(&self) -> String {
        resolve_api_base(self.api_base.as_deref(), "CLOUDFLARE_API_BASE", DEFAULT_API_BASE)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

fn default_worker_name() -> String {
    "cdn-edge".to_string()
}

fn default_timeout() -> u64 {
    30
}
