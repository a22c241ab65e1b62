//! Failover availability report

use crate::core::providers::{CdnProvider, HealthStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Availability of one CDN in the failover chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackTarget {
    pub provider: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<HealthStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FallbackTarget {
    pub fn unavailable(provider: &str, error: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            available: false,
            status: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }
}

/// Local filesystem fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFallback {
    pub path: PathBuf,
    pub available: bool,
}

/// Three-way availability report: primary, secondary, local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackReport {
    pub primary: FallbackTarget,
    pub secondary: Option<FallbackTarget>,
    pub local: Option<LocalFallback>,
}

impl FallbackReport {
    /// Whether anything in the chain can serve traffic
    pub fn any_available(&self) -> bool {
        self.primary.available
            || self.secondary.as_ref().is_some_and(|s| s.available)
            || self.local.as_ref().is_some_and(|l| l.available)
    }
}

/// Health-check one adapter, folding any error into the target
pub(crate) async fn probe(provider: &Arc<dyn CdnProvider>) -> FallbackTarget {
    let name = provider.name();
    match provider.health_check().await {
        Ok(result) => {
            debug!(provider = name, status = %result.status, "Fallback probe");
            FallbackTarget {
                provider: name.to_string(),
                available: result.status.is_available(),
                status: Some(result.status),
                response_time_ms: Some(result.response_time_ms),
                error: None,
            }
        }
        Err(e) => {
            warn!(provider = name, error = %e, "Fallback probe failed");
            FallbackTarget::unavailable(name, e.to_string())
        }
    }
}

/// Check that the local fallback path exists
pub(crate) async fn probe_local(path: &Path) -> LocalFallback {
    let available = tokio::fs::try_exists(path).await.unwrap_or(false);
    LocalFallback {
        path: path.to_path_buf(),
        available,
    }
}
