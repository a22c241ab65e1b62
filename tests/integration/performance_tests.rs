//! Performance monitor tests against mocked sites

#[cfg(test)]
mod tests {
    use crate::common::{SiteProfile, mock_site};
    use cdn_deploy::config::MonitoringConfig;
    use cdn_deploy::core::performance::PerformanceMonitor;
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    fn monitor(server: &wiremock::MockServer, metrics_dir: &std::path::Path) -> PerformanceMonitor {
        let config = MonitoringConfig {
            regions: vec!["us-east".to_string(), "eu-west".to_string()],
            metrics_dir: metrics_dir.to_path_buf(),
            ..Default::default()
        };
        let base = Url::parse(&server.uri()).unwrap();
        PerformanceMonitor::with_base_url("www.example.com", base, config).unwrap()
    }

    #[tokio::test]
    async fn test_cdn_fronted_site_reports_cache_hits() {
        let server = mock_site(SiteProfile::Hardened).await;
        let dir = tempfile::tempdir().unwrap();

        let report = monitor(&server, dir.path()).run_performance_check().await.unwrap();
        assert_eq!(report.endpoints.len(), 2);
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.stats.samples, 4);
        assert_eq!(report.availability, 100.0);
        assert_eq!(report.cache_hit_ratio, Some(50.0));
        assert!(report.stats.p95_ms >= report.stats.avg_ms || report.stats.samples < 20);
        assert!(report.stats.min_ms <= report.stats.max_ms);
    }

    #[tokio::test]
    async fn test_bounded_monitoring_writes_snapshots() {
        let server = mock_site(SiteProfile::Hardened).await;
        let dir = tempfile::tempdir().unwrap();
        let monitor = Arc::new(monitor(&server, dir.path()));

        let snapshot = monitor
            .monitor_for(Duration::from_millis(100), Duration::from_millis(350))
            .await
            .unwrap();

        assert!(snapshot.samples >= 1);
        assert!(!monitor.is_monitoring());
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, snapshot.samples);
        assert!(monitor.alerts().get_history(None).is_empty());
    }
}
