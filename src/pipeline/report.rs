//! Deployment report

use super::build::BuildOutput;
use super::{StageRecord, StageStatus};
use crate::core::manager::DeployResult;
use crate::core::performance::PerformanceReport;
use crate::core::security::ScanReport;
use crate::monitoring::MetricsSnapshot;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the deployment report
pub const DEPLOYMENT_REPORT_FILE: &str = "cdn-deployment-report.json";

/// Everything one pipeline run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub domain: String,
    pub provider: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub success: bool,
    pub dry_run: bool,
    pub stages: Vec<StageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeployResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_deployment: Option<DeployResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<ScanReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<MetricsSnapshot>,
    pub total_duration_ms: u64,
}

impl DeploymentReport {
    pub fn new(domain: &str, provider: &str, dry_run: bool) -> Self {
        Self {
            domain: domain.to_string(),
            provider: provider.to_string(),
            timestamp: chrono::Utc::now(),
            success: false,
            dry_run,
            stages: Vec::new(),
            build: None,
            deployment: None,
            fallback_deployment: None,
            security: None,
            performance: None,
            monitoring: None,
            total_duration_ms: 0,
        }
    }

    pub fn stage(&self, name: &str) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn has_failures(&self) -> bool {
        self.stages.iter().any(|s| s.status == StageStatus::Failed)
    }

    pub fn warnings(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| s.status == StageStatus::Warning)
            .count()
    }

    /// One-line human summary used for notifications
    pub fn summary_text(&self) -> String {
        let outcome = if self.success { "succeeded" } else { "failed" };
        let mut text = format!(
            "CDN deployment of {} via {} {}",
            self.domain, self.provider, outcome
        );
        if self.dry_run {
            text.push_str(" (dry run)");
        }
        if let Some(scan) = &self.security {
            text.push_str(&format!(
                "; security grade {} ({:.1}%)",
                scan.grade, scan.percentage
            ));
        }
        if let Some(failed) = self.stages.iter().find(|s| s.status == StageStatus::Failed) {
            text.push_str(&format!("; failed at {}", failed.name));
        }
        text
    }

    /// Write `cdn-deployment-report.json` into `dir`
    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(DEPLOYMENT_REPORT_FILE);
        crate::utils::fs::write_json(&path, self).await?;
        info!("Deployment report saved to {}", path.display());
        Ok(path)
    }
}
