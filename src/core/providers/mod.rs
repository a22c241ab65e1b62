//! CDN provider adapters
//!
//! Each vendor module wraps one CDN's REST API behind [`CdnProvider`]. The
//! adapters are collected into a [`ProviderRegistry`] that the
//! [`CdnManager`](crate::core::manager::CdnManager) receives at construction.

pub mod cloudflare;
pub mod cloudfront;
pub mod error;
pub mod fastly;
pub mod netlify;
pub mod provider_registry;
pub mod shared;
pub mod types;
pub mod vercel;

pub use error::{ProviderError, ProviderResult};
pub use provider_registry::ProviderRegistry;
pub use types::*;

use async_trait::async_trait;

/// Names of the built-in adapters
pub const SUPPORTED_PROVIDERS: &[&str] = &["cloudflare", "cloudfront", "fastly", "netlify", "vercel"];

/// Uniform interface over one CDN vendor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CdnProvider: Send + Sync {
    /// Registry key of this adapter
    fn name(&self) -> &'static str;

    /// Map the generic policy into the vendor's configuration shape; no side effects
    fn generate_config(&self, policy: &EdgePolicy) -> ProviderResult<ProviderConfig>;

    /// Check credentials and confirm connectivity with one authenticated call
    ///
    /// Missing or rejected credentials are reported in the returned
    /// [`ValidationReport`]; an `Err` is reserved for failures of the
    /// validation machinery itself.
    async fn validate(&self) -> ProviderResult<ValidationReport>;

    /// Create or update the vendor resource; stops at the first failing call
    async fn deploy(&self, config: &ProviderConfig) -> ProviderResult<DeploymentOutcome>;

    /// Single lightweight request against the vendor
    async fn health_check(&self) -> ProviderResult<HealthCheckResult>;

    /// Read-only status or analytics summary
    async fn monitor(&self) -> ProviderResult<ProviderSnapshot>;
}
