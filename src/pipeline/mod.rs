//! Deployment and integration-test pipelines
//!
//! Both run named stages in order. Each stage is recorded with a status and
//! its duration; a failed hard stage skips the remaining work stages but the
//! report and notification stages always run.

pub mod build;
pub mod deploy;
pub mod integration;
pub mod report;


pub use build::{BuildOutput, run_build};
pub use deploy::DeployPipeline;
pub use integration::{IntegrationReport, IntegrationTester, TestResult, TestStatus};
pub use report::DeploymentReport;

use crate::utils::logging::redact;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Outcome of one pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Success,
    Warning,
    Failed,
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Success => "success",
            StageStatus::Warning => "warning",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Record of one executed (or skipped) stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub name: String,
    pub status: StageStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageRecord {
    /// Finish a stage started at `started`; messages are redacted
    pub fn finish(name: &str, status: StageStatus, started: Instant, message: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            duration_ms: started.elapsed().as_millis() as u64,
            message: message.map(|m| redact(&m)),
        }
    }

    pub fn skipped(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            status: StageStatus::Skipped,
            duration_ms: 0,
            message: Some(reason.to_string()),
        }
    }
}
