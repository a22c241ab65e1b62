//! Provider Registry
//!
//! Explicit name to adapter map handed to the manager.

use super::cloudflare::CloudflareProvider;
use super::cloudfront::CloudFrontProvider;
use super::error::ProviderResult;
use super::fastly::FastlyProvider;
use super::netlify::NetlifyProvider;
use super::types::SiteLayout;
use super::vercel::VercelProvider;
use super::CdnProvider;
use crate::config::Config;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registered CDN adapters keyed by name
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn CdnProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in adapters configured from `config`
    pub fn with_defaults(config: &Config) -> ProviderResult<Self> {
        let layout = SiteLayout {
            working_dir: config.deployment.working_dir.clone(),
            build_command: config.deployment.build_command.clone(),
            publish_dir: config.deployment.build_dir.clone(),
        };

        let mut registry = Self::new();
        registry.register(Arc::new(CloudflareProvider::new(
            config.providers.cloudflare.clone(),
        )?));
        registry.register(Arc::new(CloudFrontProvider::new(
            config.providers.cloudfront.clone(),
        )?));
        registry.register(Arc::new(FastlyProvider::new(config.providers.fastly.clone())?));
        registry.register(Arc::new(NetlifyProvider::new(
            config.providers.netlify.clone(),
            layout.clone(),
        )?));
        registry.register(Arc::new(VercelProvider::new(
            config.providers.vercel.clone(),
            layout,
        )?));
        Ok(registry)
    }

    /// Register an adapter under its own name, replacing any previous one
    pub fn register(&mut self, provider: Arc<dyn CdnProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Register an adapter under an explicit name
    pub fn register_as(&mut self, name: impl Into<String>, provider: Arc<dyn CdnProvider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get provider by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn CdnProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list())
            .finish()
    }
}
