//! Deployment pipeline
//!
//! pre-checks -> build -> deploy primary -> deploy fallback -> security scan
//! -> performance test -> monitoring -> report -> notify
//!
//! Hard stages (pre-checks, build, primary deploy, and the security scan
//! unless forced) stop the pipeline on failure. The other stages degrade to
//! warnings. Nothing is rolled back.

use super::build::run_build;
use super::report::DeploymentReport;
use super::{StageRecord, StageStatus};
use crate::config::Config;
use crate::core::manager::{CdnManager, DeployOptions};
use crate::core::performance::{PerformanceMonitor, threshold_alerts};
use crate::core::providers::ProviderRegistry;
use crate::core::security::SecurityScanner;
use crate::monitoring::{AlertManager, WebhookChannel};
use crate::utils::error::Result;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use url::Url;

/// Runs the full deployment sequence for one configuration
#[derive(Debug, Clone)]
pub struct DeployPipeline {
    config: Config,
    registry: ProviderRegistry,
    options: DeployOptions,
    /// Probe this URL instead of `https://<domain>` for scans and monitoring
    probe_base: Option<Url>,
}

impl DeployPipeline {
    pub fn new(config: Config, registry: ProviderRegistry, options: DeployOptions) -> Self {
        Self {
            config,
            registry,
            options,
            probe_base: None,
        }
    }

    pub fn with_probe_base(mut self, base: Url) -> Self {
        self.probe_base = Some(base);
        self
    }

    /// Run every stage, write the report and notify. Stage failures are
    /// reflected in the report; only a report that cannot be written is an error.
    pub async fn run(&self) -> Result<DeploymentReport> {
        let started = Instant::now();
        let deployment = &self.config.deployment;
        info!(
            provider = %deployment.provider,
            domain = %deployment.domain,
            dry_run = self.options.dry_run,
            force = self.options.force,
            "Starting CDN deployment pipeline"
        );

        let mut report =
            DeploymentReport::new(&deployment.domain, &deployment.provider, self.options.dry_run);
        let completed = self.run_stages(&mut report).await;
        report.success = completed && !report.has_failures();
        report.total_duration_ms = started.elapsed().as_millis() as u64;

        let report_started = Instant::now();
        let report_path = deployment.report_dir.join(super::report::DEPLOYMENT_REPORT_FILE);
        report.stages.push(StageRecord::finish(
            "report",
            StageStatus::Success,
            report_started,
            Some(report_path.display().to_string()),
        ));
        report.save(&deployment.report_dir).await?;

        self.notify(&mut report).await;

        if report.success {
            info!("{}", report.summary_text());
        } else {
            error!("{}", report.summary_text());
        }
        Ok(report)
    }

    /// Returns false when a hard stage failed
    async fn run_stages(&self, report: &mut DeploymentReport) -> bool {
        let dry_run = self.options.dry_run;

        // pre-checks
        let started = Instant::now();
        let manager = match self.pre_checks() {
            Ok(manager) => {
                report.stages.push(StageRecord::finish("pre-checks", StageStatus::Success, started, None));
                manager
            }
            Err(e) => {
                report.stages.push(StageRecord::finish(
                    "pre-checks",
                    StageStatus::Failed,
                    started,
                    Some(e.to_string()),
                ));
                return false;
            }
        };

        // build
        if dry_run {
            report.stages.push(StageRecord::skipped("build", "dry run"));
        } else {
            let started = Instant::now();
            match run_build(&self.config.deployment).await {
                Ok(output) => {
                    report.stages.push(StageRecord::finish(
                        "build",
                        StageStatus::Success,
                        started,
                        Some(format!("{} files in {}", output.files, output.output_dir.display())),
                    ));
                    report.build = Some(output);
                }
                Err(e) => {
                    report.stages.push(StageRecord::finish(
                        "build",
                        StageStatus::Failed,
                        started,
                        Some(e.to_string()),
                    ));
                    return false;
                }
            }
        }

        // primary deploy
        let started = Instant::now();
        match manager.deploy(self.options).await {
            Ok(result) => {
                let (status, message) = if result.warnings.is_empty() {
                    (StageStatus::Success, None)
                } else {
                    (StageStatus::Warning, Some(result.warnings.join("; ")))
                };
                report.stages.push(StageRecord::finish("deploy", status, started, message));
                report.deployment = Some(result);
            }
            Err(e) => {
                report.stages.push(StageRecord::finish(
                    "deploy",
                    StageStatus::Failed,
                    started,
                    Some(e.to_string()),
                ));
                return false;
            }
        }

        // fallback deploy
        match &self.config.deployment.fallback.provider {
            Some(name) => {
                let started = Instant::now();
                let result = match manager.for_provider(name) {
                    Ok(fallback) => fallback.deploy(self.options).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(result) => {
                        report.stages.push(StageRecord::finish(
                            "fallback-deploy",
                            StageStatus::Success,
                            started,
                            Some(format!("deployed to {}", result.provider)),
                        ));
                        report.fallback_deployment = Some(result);
                    }
                    Err(e) => {
                        warn!("Fallback deployment to {} failed: {}", name, e);
                        report.stages.push(StageRecord::finish(
                            "fallback-deploy",
                            StageStatus::Warning,
                            started,
                            Some(e.to_string()),
                        ));
                    }
                }
            }
            None => report
                .stages
                .push(StageRecord::skipped("fallback-deploy", "no fallback provider")),
        }

        if dry_run {
            for stage in ["security-scan", "performance-test", "monitoring"] {
                report.stages.push(StageRecord::skipped(stage, "dry run"));
            }
            return true;
        }

        if !self.security_scan(report).await {
            return false;
        }
        self.performance_test(report).await;
        self.monitoring(report).await;
        true
    }

    fn pre_checks(&self) -> Result<CdnManager> {
        self.config.validate()?;
        CdnManager::new(self.config.clone(), self.registry.clone())
    }

    fn scanner(&self) -> Result<SecurityScanner> {
        let domain = &self.config.deployment.domain;
        let config = self.config.security.clone();
        match &self.probe_base {
            Some(base) => SecurityScanner::with_base_url(domain, base.clone(), config),
            None => SecurityScanner::new(domain, config),
        }
    }

    fn performance_monitor(&self) -> Result<PerformanceMonitor> {
        let domain = &self.config.deployment.domain;
        let config = self.config.monitoring.clone();
        let monitor = match &self.probe_base {
            Some(base) => PerformanceMonitor::with_base_url(domain, base.clone(), config)?,
            None => PerformanceMonitor::new(domain, config)?,
        };
        let alerts =
            AlertManager::with_webhook(self.config.deployment.webhook_url.as_deref(), domain)?;
        Ok(monitor.with_alert_manager(alerts))
    }

    /// Returns false when the scan failed its threshold without `force`
    async fn security_scan(&self, report: &mut DeploymentReport) -> bool {
        if !self.config.security.enabled {
            report.stages.push(StageRecord::skipped("security-scan", "disabled"));
            return true;
        }
        let started = Instant::now();
        let scanner = match self.scanner() {
            Ok(scanner) => scanner,
            Err(e) => {
                let status = self.soft_failure_status();
                report.stages.push(StageRecord::finish("security-scan", status, started, Some(e.to_string())));
                return status != StageStatus::Failed;
            }
        };

        let scan = scanner.run_full_scan().await;
        if let Err(e) = scan.save(&self.config.deployment.report_dir).await {
            warn!("Failed to save security report: {}", e);
        }
        let message = format!(
            "score {:.1}% (grade {}), threshold {:.1}%",
            scan.percentage, scan.grade, scan.threshold
        );
        let status = if scan.passed {
            StageStatus::Success
        } else {
            warn!("Security scan below threshold: {}", message);
            self.soft_failure_status()
        };
        report.stages.push(StageRecord::finish("security-scan", status, started, Some(message)));
        report.security = Some(scan);
        status != StageStatus::Failed
    }

    /// Security problems are fatal unless forced
    fn soft_failure_status(&self) -> StageStatus {
        if self.options.force {
            StageStatus::Warning
        } else {
            StageStatus::Failed
        }
    }

    async fn performance_test(&self, report: &mut DeploymentReport) {
        if !self.config.monitoring.performance_test_enabled {
            report.stages.push(StageRecord::skipped("performance-test", "disabled"));
            return;
        }
        let started = Instant::now();
        let result = match self.performance_monitor() {
            Ok(monitor) => monitor.run_performance_check().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(performance) => {
                let breaches = threshold_alerts(
                    &self.config.deployment.domain,
                    &performance,
                    &self.config.monitoring.thresholds,
                );
                let status = if breaches.is_empty() {
                    StageStatus::Success
                } else {
                    StageStatus::Warning
                };
                let message = format!(
                    "avg {:.0}ms, p95 {:.0}ms, availability {:.1}%",
                    performance.stats.avg_ms, performance.stats.p95_ms, performance.availability
                );
                report.stages.push(StageRecord::finish("performance-test", status, started, Some(message)));
                report.performance = Some(performance);
            }
            Err(e) => report.stages.push(StageRecord::finish(
                "performance-test",
                StageStatus::Warning,
                started,
                Some(e.to_string()),
            )),
        }
    }

    async fn monitoring(&self, report: &mut DeploymentReport) {
        let monitoring = &self.config.monitoring;
        if !monitoring.monitoring_enabled {
            report.stages.push(StageRecord::skipped("monitoring", "disabled"));
            return;
        }
        let started = Instant::now();
        let result = match self.performance_monitor() {
            Ok(monitor) => {
                Arc::new(monitor)
                    .monitor_for(
                        Duration::from_millis(monitoring.interval_ms),
                        Duration::from_secs(monitoring.duration_secs),
                    )
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(snapshot) => {
                report.stages.push(StageRecord::finish(
                    "monitoring",
                    StageStatus::Success,
                    started,
                    Some(format!("{} samples", snapshot.samples)),
                ));
                report.monitoring = Some(snapshot);
            }
            Err(e) => report.stages.push(StageRecord::finish(
                "monitoring",
                StageStatus::Warning,
                started,
                Some(e.to_string()),
            )),
        }
    }

    /// POST `{text, report, domain}` to the webhook; failures are warnings
    async fn notify(&self, report: &mut DeploymentReport) {
        let Some(url) = &self.config.deployment.webhook_url else {
            report.stages.push(StageRecord::skipped("notify", "no webhook configured"));
            return;
        };
        let started = Instant::now();
        let payload = json!({
            "text": report.summary_text(),
            "report": &*report,
            "domain": report.domain,
        });
        let result = match WebhookChannel::new(url.as_str(), report.domain.as_str()) {
            Ok(channel) => channel.post(&payload).await,
            Err(e) => Err(e),
        };
        let record = match result {
            Ok(()) => StageRecord::finish("notify", StageStatus::Success, started, None),
            Err(e) => {
                warn!("Notification failed: {}", e);
                StageRecord::finish("notify", StageStatus::Warning, started, Some(e.to_string()))
            }
        };
        report.stages.push(record);
    }
}
