//! CDN manager
//!
//! Selects the active adapter from an injected [`ProviderRegistry`], builds
//! the provider-agnostic [`EdgePolicy`] from configuration and dispatches
//! validation, deployment and monitoring calls.

mod fallback;
mod headers;
mod tests;

pub use fallback::{FallbackReport, FallbackTarget, LocalFallback};
pub use headers::{generate_csp_header, generate_headers};

use crate::config::Config;
use crate::core::providers::{
    CdnProvider, DeploymentOutcome, EdgePolicy, HealthCheckResult, ProviderConfig, ProviderRegistry,
    ProviderSnapshot, ValidationReport,
};
use crate::utils::error::{CdnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Deployment switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOptions {
    /// Return the would-be configuration without any network call
    pub dry_run: bool,
    /// Proceed even when validation fails
    pub force: bool,
}

/// Result of [`CdnManager::deploy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployResult {
    pub success: bool,
    pub dry_run: bool,
    pub provider: String,
    /// Generated vendor configuration
    pub config: ProviderConfig,
    /// Vendor response; absent for dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DeploymentOutcome>,
    /// Validation problems overridden by `force`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Dispatches operations to the active CDN adapter
#[derive(Clone)]
pub struct CdnManager {
    config: Config,
    registry: ProviderRegistry,
    provider: Arc<dyn CdnProvider>,
}

impl std::fmt::Debug for CdnManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnManager")
            .field("provider", &self.provider.name())
            .field("registry", &self.registry)
            .finish()
    }
}

impl CdnManager {
    /// Bind to `config.deployment.provider`; fails without I/O when it is not registered
    pub fn new(config: Config, registry: ProviderRegistry) -> Result<Self> {
        let name = config.deployment.provider.clone();
        let provider = registry
            .get(&name)
            .ok_or_else(|| CdnError::ProviderNotFound(format!(
                "'{}' (available: {})",
                name,
                registry.list().join(", ")
            )))?;

        Ok(Self {
            config,
            registry,
            provider,
        })
    }

    /// Manager for another registered provider sharing this configuration
    pub fn for_provider(&self, name: &str) -> Result<Self> {
        let mut config = self.config.clone();
        config.deployment.provider = name.to_string();
        Self::new(config, self.registry.clone())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Merged security, CORS and CSP headers
    pub fn generate_headers(&self) -> BTreeMap<String, String> {
        generate_headers(&self.config)
    }

    /// Serialized Content-Security-Policy value
    pub fn generate_csp_header(&self) -> String {
        generate_csp_header(&self.config.policy.csp)
    }

    /// Provider-agnostic policy handed to adapters
    pub fn edge_policy(&self) -> EdgePolicy {
        let deployment = &self.config.deployment;
        EdgePolicy {
            domain: deployment.domain.clone(),
            origin: deployment.origin.clone(),
            fallback_origin: deployment.fallback.origin.clone(),
            headers: self.generate_headers(),
            cache_rules: self.config.policy.cache_rules.clone(),
            optimization: self.config.policy.optimization.clone(),
            transport: self.config.policy.transport.clone(),
        }
    }

    /// Vendor configuration for the active provider
    pub fn generate_provider_config(&self) -> Result<ProviderConfig> {
        Ok(self.provider.generate_config(&self.edge_policy())?)
    }

    /// Validate settings, then ask the adapter to check credentials and connectivity
    pub async fn validate_configuration(&self) -> Result<ValidationReport> {
        let mut report = self.validate_settings();
        report.merge(self.provider.validate().await?);
        Ok(report)
    }

    /// Configuration checks that need no network access
    fn validate_settings(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if let Err(e) = self.config.validate() {
            report.error(e.to_string());
        }
        if let Some(secondary) = &self.config.deployment.fallback.provider {
            if secondary == self.provider.name() {
                report.warning("Fallback provider is the same as the primary provider");
            } else if !self.registry.contains(secondary) {
                report.error(format!("Fallback provider '{}' is not registered", secondary));
            }
        }
        report
    }

    /// Validate, then deploy the generated configuration
    ///
    /// A dry run validates settings only and returns the generated
    /// configuration without touching the network. Otherwise an invalid
    /// report aborts before any configuration is generated unless
    /// `force` is set.
    pub async fn deploy(&self, options: DeployOptions) -> Result<DeployResult> {
        let report = if options.dry_run {
            self.validate_settings()
        } else {
            self.validate_configuration().await?
        };

        let mut warnings = report.warnings.clone();
        if !report.valid {
            if !options.force {
                return Err(CdnError::Validation(format!(
                    "Configuration validation failed: {}",
                    report.errors.join(", ")
                )));
            }
            warn!(errors = ?report.errors, "Validation failed; continuing because force is set");
            warnings.extend(report.errors.iter().cloned());
        }

        let config = self.generate_provider_config()?;

        if options.dry_run {
            info!(provider = self.provider.name(), "Dry run: skipping deployment");
            return Ok(DeployResult {
                success: true,
                dry_run: true,
                provider: self.provider.name().to_string(),
                config,
                outcome: None,
                warnings,
            });
        }

        info!(provider = self.provider.name(), domain = %self.config.deployment.domain, "Deploying");
        let outcome = self.provider.deploy(&config).await?;

        Ok(DeployResult {
            success: true,
            dry_run: false,
            provider: self.provider.name().to_string(),
            config,
            outcome: Some(outcome),
            warnings,
        })
    }

    pub async fn health_check(&self) -> Result<HealthCheckResult> {
        Ok(self.provider.health_check().await?)
    }

    pub async fn monitor(&self) -> Result<ProviderSnapshot> {
        Ok(self.provider.monitor().await?)
    }

    /// Health-check primary, secondary and local fallback in sequence; never fails
    pub async fn test_fallback(&self) -> FallbackReport {
        let primary = fallback::probe(&self.provider).await;

        let secondary = match &self.config.deployment.fallback.provider {
            Some(name) => Some(match self.registry.get(name) {
                Some(provider) => fallback::probe(&provider).await,
                None => FallbackTarget::unavailable(name, "provider is not registered"),
            }),
            None => None,
        };

        let local = match &self.config.deployment.fallback.local_path {
            Some(path) => Some(fallback::probe_local(path).await),
            None => None,
        };

        FallbackReport {
            primary,
            secondary,
            local,
        }
    }
}
