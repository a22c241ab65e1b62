//! CloudFront configuration

use crate::core::providers::shared::{env_opt, resolve_api_base};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://cloudfront.amazonaws.com";

/// AWS credentials and distribution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,

    /// Existing distribution; a new one is created when absent
    pub distribution_id: Option<String>,

    /// ACM certificate for the aliases; the default certificate is used when absent
    pub certificate_arn: Option<String>,

    /// API base URL (defaults to https://cloudfront.amazonaws.com)
    pub api_base: Option<String>,

    #[serde(default = "default_price_class")]
    pub price_class: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for CloudFrontConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            distribution_id: None,
            certificate_arn: None,
            api_base: None,
            price_class: default_price_class(),
            timeout: default_timeout(),
        }
    }
}

impl CloudFrontConfig {
    /// Read settings from `AWS_*` and `CLOUDFRONT_*` environment variables
    pub fn from_env() -> Self {
        Self {
            access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            session_token: env_opt("AWS_SESSION_TOKEN"),
            distribution_id: env_opt("CLOUDFRONT_DISTRIBUTION_ID"),
            certificate_arn: env_opt("CLOUDFRONT_CERTIFICATE_ARN"),
            api_base: env_opt("CLOUDFRONT_API_BASE"),
            price_class: env_opt("CLOUDFRONT_PRICE_CLASS").unwrap_or_else(default_price_class),
            ..Default::default()
        }
    }

    pub fn get_api_base(&self) -> String {
        resolve_api_base(self.api_base.as_deref(), "CLOUDFRONT_API_BASE", DEFAULT_API_BASE)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

fn default_price_class() -> String {
    "PriceClass_100".to_string()
}

fn default_timeout() -> u64 {
    30
}
