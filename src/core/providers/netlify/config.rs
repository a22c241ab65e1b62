//! Netlify configuration

use crate::core::providers::shared::{env_opt, resolve_api_base};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.netlify.com";

/// Netlify site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetlifyConfig {
    pub auth_token: Option<String>,
    pub site_id: Option<String>,
    /// Build hook URL; preferred over the API when set
    pub build_hook: Option<String>,
    /// API base URL (defaults to https://api.netlify.com)
    pub api_base: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for NetlifyConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            site_id: None,
            build_hook: None,
            api_base: None,
            timeout: default_timeout(),
        }
    }
}

impl NetlifyConfig {
    pub fn from_env() -> Self {
        Self {
            auth_token: env_opt("NETLIFY_AUTH_TOKEN"),
            site_id: env_opt("NETLIFY_SITE_ID"),
            build_hook: env_opt("NETLIFY_BUILD_HOOK"),
            api_base: env_opt("NETLIFY_API_BASE"),
            ..Default::default()
        }
    }

    pub fn get_api_base(&self) -> String {
        resolve_api_base(self.api_base.as_deref(), "NETLIFY_API_BASE", DEFAULT_API_BASE)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

fn default_timeout() -> u64 {
    30
}
