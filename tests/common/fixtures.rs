//! Configuration fixtures
//!
//! Every factory writes reports, metrics and generated artifacts under the
//! given directory so tests never touch the working tree.

use cdn_deploy::config::Config;
use cdn_deploy::core::providers::ProviderRegistry;
use std::path::Path;

/// Factory for test configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Configuration for `provider` with every probe stage disabled
    pub fn quiet(provider: &str, dir: &Path) -> Config {
        let mut config = Config::default();
        config.deployment.provider = provider.to_string();
        config.deployment.domain = "www.example.com".to_string();
        config.deployment.working_dir = dir.to_path_buf();
        config.deployment.report_dir = dir.join("reports");
        config.deployment.build_command = "mkdir -p dist".to_string();
        config.security.enabled = false;
        config.monitoring.performance_test_enabled = false;
        config.monitoring.monitoring_enabled = false;
        config.monitoring.metrics_dir = dir.join("metrics");
        config.monitoring.regions = vec!["us-east".to_string()];
        config
    }

    /// `quiet` with every vendor API pointed at `api_base`
    pub fn against(provider: &str, dir: &Path, api_base: &str) -> Config {
        let mut config = Self::quiet(provider, dir);
        let base = Some(api_base.to_string());
        config.providers.cloudflare.api_base = base.clone();
        config.providers.cloudfront.api_base = base.clone();
        config.providers.fastly.api_base = base.clone();
        config.providers.netlify.api_base = base.clone();
        config.providers.vercel.api_base = base;
        config
    }
}

/// Built-in registry for `config`
pub fn registry_for(config: &Config) -> ProviderRegistry {
    ProviderRegistry::with_defaults(config).expect("built-in providers should initialise")
}
