//! Performance checks and the recurring monitoring loop

use super::regions::{select_regions, simulate_region};
use super::stats::{RequestOutcome, availability_and_error_rate, cache_hit_ratio};
use super::timing::measure_endpoint;
use super::types::{PerformanceReport, PerformanceStats};
use crate::config::{AlertThresholds, MonitoringConfig};
use crate::monitoring::metrics::retention::{prune_older_than, write_snapshot};
use crate::monitoring::{Alert, AlertKind, AlertManager, AlertSeverity, MetricSample, MetricsSnapshot, MetricsStore};
use crate::utils::error::{CdnError, Result};
use crate::utils::net::client::PERFORMANCE_PROBE_TIMEOUT;
use crate::utils::net::{ClientUtils, HttpClientConfig};
use futures::future::join_all;
use parking_lot::Mutex;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use url::Url;

/// Handle to the running monitoring loop
#[derive(Debug)]
struct MonitorTask {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Probes one domain for latency, availability and cache behaviour
#[derive(Debug)]
pub struct PerformanceMonitor {
    domain: String,
    base_url: Url,
    config: MonitoringConfig,
    client: Client,
    metrics: MetricsStore,
    alerts: AlertManager,
    task: Mutex<Option<MonitorTask>>,
}

impl PerformanceMonitor {
    /// Monitor for `https://<domain>`
    pub fn new(domain: &str, config: MonitoringConfig) -> Result<Self> {
        let base_url = ClientUtils::normalize_base_url(domain)?;
        Self::with_base_url(domain, base_url, config)
    }

    /// Monitor probing an explicit base URL
    pub fn with_base_url(domain: &str, base_url: Url, config: MonitoringConfig) -> Result<Self> {
        let client = ClientUtils::create_http_client(&HttpClientConfig::with_timeout(
            PERFORMANCE_PROBE_TIMEOUT,
        ))?;
        Ok(Self {
            domain: domain.to_string(),
            base_url,
            config,
            client,
            metrics: MetricsStore::new(),
            alerts: AlertManager::new(),
            task: Mutex::new(None),
        })
    }

    /// Share an alert manager, typically one with a webhook channel
    pub fn with_alert_manager(mut self, alerts: AlertManager) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn metrics(&self) -> &MetricsStore {
        &self.metrics
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    /// `/` plus every configured sub-path
    pub fn endpoints(&self) -> Result<Vec<Url>> {
        let mut urls = vec![self.base_url.clone()];
        for path in &self.config.sub_paths {
            let url = self
                .base_url
                .join(path)
                .map_err(|e| CdnError::config(format!("Invalid sub-path {}: {}", path, e)))?;
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        Ok(urls)
    }

    /// Time every endpoint sequentially, then fan out the regional simulation
    pub async fn run_performance_check(&self) -> Result<PerformanceReport> {
        info!("Running performance check for {}", self.domain);

        let mut endpoints = Vec::new();
        for url in self.endpoints()? {
            endpoints.push(measure_endpoint(&self.client, &url, PERFORMANCE_PROBE_TIMEOUT).await);
        }

        let regions = join_all(
            select_regions(&self.config.regions)
                .into_iter()
                .map(|(region, latency)| {
                    simulate_region(&self.client, &self.base_url, region, latency)
                }),
        )
        .await;

        let response_times: Vec<f64> = endpoints
            .iter()
            .filter_map(|e| e.total_ms)
            .chain(
                regions
                    .iter()
                    .filter(|r| r.status.is_some())
                    .map(|r| r.response_time_ms),
            )
            .collect();

        let outcomes: Vec<RequestOutcome> = endpoints
            .iter()
            .map(|e| RequestOutcome { status: e.status })
            .chain(regions.iter().map(|r| RequestOutcome { status: r.status }))
            .collect();
        let (availability, error_rate) = availability_and_error_rate(&outcomes);

        let report = PerformanceReport {
            domain: self.domain.clone(),
            timestamp: chrono::Utc::now(),
            cache_hit_ratio: cache_hit_ratio(endpoints.iter().map(|e| e.cache_hit)),
            stats: PerformanceStats::from_samples(&response_times),
            endpoints,
            regions,
            availability,
            error_rate,
            alerts: Vec::new(),
        };
        info!(
            "Performance: avg {:.0}ms, p95 {:.0}ms, availability {:.1}%, errors {:.1}%",
            report.stats.avg_ms, report.stats.p95_ms, report.availability, report.error_rate
        );
        Ok(report)
    }

    /// Check, record, alert, snapshot and prune
    pub async fn run_cycle(&self) -> Result<PerformanceReport> {
        let mut report = self.run_performance_check().await?;

        self.metrics.record(MetricSample {
            timestamp: report.timestamp,
            response_time_ms: report.stats.avg_ms,
            availability: report.availability,
            error_rate: report.error_rate,
            cache_hit_ratio: report.cache_hit_ratio,
        });

        report.alerts = threshold_alerts(&self.domain, &report, &self.config.thresholds);
        for alert in &report.alerts {
            self.alerts.send_alert(alert.clone()).await;
        }

        let dir = self.metrics_dir();
        write_snapshot(&dir, &report).await?;
        let retention = Duration::from_secs(self.config.retention_hours.saturating_mul(3600));
        prune_older_than(&dir, retention).await?;

        Ok(report)
    }

    pub fn is_monitoring(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }

    /// Start the recurring loop. Returns `Ok(false)`, doing nothing, when a
    /// loop is already running for this monitor.
    pub fn start_monitoring(self: &Arc<Self>, interval: Duration) -> Result<bool> {
        if interval.is_zero() {
            return Err(CdnError::Monitoring(
                "Monitoring interval must be greater than zero".to_string(),
            ));
        }

        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            info!("Monitoring already running for {}", self.domain);
            return Ok(false);
        }

        let (stop, mut stopped) = watch::channel(false);
        let monitor = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    changed = stopped.changed() => {
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = monitor.run_cycle().await {
                            warn!("Monitoring cycle failed: {}", e);
                        }
                    }
                }
            }
            debug!("Monitoring loop for {} exited", monitor.domain);
        });

        info!("Started monitoring {} every {:?}", self.domain, interval);
        *task = Some(MonitorTask { stop, handle });
        Ok(true)
    }

    /// Signal the loop to stop. An in-flight cycle runs to completion; await
    /// the returned handle to wait for it.
    pub fn stop_monitoring(&self) -> Option<JoinHandle<()>> {
        let task = self.task.lock().take()?;
        let _ = task.stop.send(true);
        info!("Stopping monitoring for {}", self.domain);
        Some(task.handle)
    }

    /// Monitor for a bounded duration and summarise the collected series
    pub async fn monitor_for(
        self: &Arc<Self>,
        interval: Duration,
        duration: Duration,
    ) -> Result<MetricsSnapshot> {
        if !self.start_monitoring(interval)? {
            return Err(CdnError::Monitoring(format!(
                "Monitoring already running for {}",
                self.domain
            )));
        }
        tokio::time::sleep(duration).await;
        if let Some(handle) = self.stop_monitoring() {
            handle
                .await
                .map_err(|e| CdnError::Monitoring(format!("Monitoring task failed: {}", e)))?;
        }
        Ok(self.metrics.snapshot())
    }

    pub fn metrics_dir(&self) -> PathBuf {
        self.config.metrics_dir.clone()
    }
}

/// Alerts for every breached threshold; doubling a threshold escalates to critical
pub fn threshold_alerts(
    domain: &str,
    report: &PerformanceReport,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let avg = report.stats.avg_ms;
    if report.stats.samples > 0 && avg > thresholds.response_time_ms {
        let severity = if avg > thresholds.response_time_ms * 2.0 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        alerts.push(Alert::new(
            AlertKind::ResponseTime,
            severity,
            domain,
            avg,
            thresholds.response_time_ms,
        ));
    }

    if report.availability < thresholds.availability {
        alerts.push(Alert::new(
            AlertKind::Availability,
            AlertSeverity::Critical,
            domain,
            report.availability,
            thresholds.availability,
        ));
    }

    if report.error_rate > thresholds.error_rate {
        let severity = if report.error_rate > thresholds.error_rate * 2.0 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        alerts.push(Alert::new(
            AlertKind::ErrorRate,
            severity,
            domain,
            report.error_rate,
            thresholds.error_rate,
        ));
    }

    alerts
}
