//! Vendor credential and endpoint settings

use crate::core::providers::cloudflare::CloudflareConfig;
use crate::core::providers::cloudfront::CloudFrontConfig;
use crate::core::providers::fastly::FastlyConfig;
use crate::core::providers::netlify::NetlifyConfig;
use crate::core::providers::vercel::VercelConfig;
use serde::{Deserialize, Serialize};

/// Settings for every supported vendor; only the active one is used per deploy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub cloudflare: CloudflareConfig,
    #[serde(default)]
    pub cloudfront: CloudFrontConfig,
    #[serde(default)]
    pub fastly: FastlyConfig,
    #[serde(default)]
    pub netlify: NetlifyConfig,
    #[serde(default)]
    pub vercel: VercelConfig,
}

impl ProviderSettings {
    /// Read every vendor's settings from the environment
    pub fn from_env() -> Self {
        Self {
            cloudflare: CloudflareConfig::from_env(),
            cloudfront: CloudFrontConfig::from_env(),
            fastly: FastlyConfig::from_env(),
            netlify: NetlifyConfig::from_env(),
            vercel: VercelConfig::from_env(),
        }
    }
}
