//! # cdn-deploy
//!
//! Deploys a static site to one of several CDN vendors (Cloudflare,
//! CloudFront, Fastly, Netlify, Vercel) through a single adapter interface,
//! then checks the result from the outside.
//!
//! ## Features
//!
//! - **Multi-Provider**: one `CdnProvider` trait, five vendor adapters, a
//!   secondary provider and a local path as failover targets
//! - **Policy Generation**: security headers, CSP and cache rules rendered
//!   into each vendor's configuration shape
//! - **Security Scanning**: ten HTTP/TLS checks folded into a graded score
//! - **Performance Monitoring**: per-phase timings, simulated regions,
//!   threshold alerts and a bounded metric series
//! - **Pipelines**: build, deploy, scan, test and report in one run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdn_deploy::{Config, DeployOptions, DeployPipeline, ProviderRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     let registry = ProviderRegistry::with_defaults(&config)?;
//!     let options = DeployOptions { dry_run: true, force: false };
//!
//!     let report = DeployPipeline::new(config, registry, options).run().await?;
//!     println!("{}", report.summary_text());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod pipeline;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{CdnError, Result};

pub use core::manager::{CdnManager, DeployOptions, DeployResult, FallbackReport};
pub use core::performance::{PerformanceMonitor, PerformanceReport};
pub use core::providers::{CdnProvider, ProviderError, ProviderRegistry, SUPPORTED_PROVIDERS};
pub use core::security::{Grade, ScanReport, SecurityScanner};
pub use monitoring::{Alert, AlertManager, AlertSeverity};
pub use pipeline::{DeployPipeline, DeploymentReport, IntegrationReport, IntegrationTester};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata stamped by `build.rs`
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix timestamp of the build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build metadata for `--version` output and reports
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
