//! Vercel configuration

use crate::core::providers::shared::{env_opt, resolve_api_base};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.vercel.com";

/// Vercel project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VercelConfig {
    pub token: Option<String>,
    pub project_id: Option<String>,
    /// Team scope appended to API calls when set
    pub team_id: Option<String>,
    /// Deploy hook URL; preferred over the API when set
    pub deploy_hook: Option<String>,
    /// API base URL (defaults to https://api.vercel.com)
    pub api_base: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for VercelConfig {
    fn default() -> Self {
        Self {
            token: None,
            project_id: None,
            team_id: None,
            deploy_hook: None,
            api_base: None,
            timeout: default_timeout(),
        }
    }
}

impl VercelConfig {
    pub fn from_env() -> Self {
        Self {
            token: env_opt("VERCEL_TOKEN"),
            project_id: env_opt("VERCEL_PROJECT_ID"),
            team_id: env_opt("VERCEL_TEAM_ID"),
            deploy_hook: env_opt("VERCEL_DEPLOY_HOOK"),
            api_base: env_opt("VERCEL_API_BASE"),
            ..Default::default()
        }
    }

    pub fn get_api_base(&self) -> String {
        resolve_api_base(self.api_base.as_deref(), "VERCEL_API_BASE", DEFAULT_API_BASE)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

fn default_timeout() -> u64 {
    30
}
