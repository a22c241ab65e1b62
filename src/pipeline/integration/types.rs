//! Integration test records

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the integration test report
pub const INTEGRATION_REPORT_FILE: &str = "cdn-integration-test-report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Warning,
    Failed,
}

/// Outcome of one test category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub category: String,
    pub status: TestStatus,
    pub message: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "serde_json::Value::is_null", default)]
    pub details: serde_json::Value,
}

/// Counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

/// All category results for one domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub domain: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub results: Vec<TestResult>,
    pub summary: TestSummary,
}

impl IntegrationReport {
    pub fn new(domain: &str, results: Vec<TestResult>) -> Self {
        let mut summary = TestSummary {
            total: results.len(),
            ..Default::default()
        };
        for result in &results {
            match result.status {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Warning => summary.warnings += 1,
                TestStatus::Failed => summary.failed += 1,
            }
        }
        Self {
            domain: domain.to_string(),
            timestamp: chrono::Utc::now(),
            results,
            summary,
        }
    }

    pub fn result(&self, category: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.category == category)
    }

    /// 0 when everything passed, 2 for warnings only, 1 for any failure
    pub fn exit_code(&self) -> u8 {
        if self.summary.failed > 0 {
            1
        } else if self.summary.warnings > 0 {
            2
        } else {
            0
        }
    }

    /// Write `cdn-integration-test-report.json` into `dir`
    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(INTEGRATION_REPORT_FILE);
        crate::utils::fs::write_json(&path, self).await?;
        info!("Integration report saved to {}", path.display());
        Ok(path)
    }
}
