//! Security scanner tests against mocked sites

#[cfg(test)]
mod tests {
    use crate::common::{SiteProfile, mock_site};
    use cdn_deploy::config::SecurityScanConfig;
    use cdn_deploy::core::security::{Grade, SecurityScanner, Severity};
    use url::Url;

    fn scanner(server: &wiremock::MockServer) -> SecurityScanner {
        let config = SecurityScanConfig {
            rate_limit_burst: 3,
            ..Default::default()
        };
        let base = Url::parse(&server.uri()).unwrap();
        SecurityScanner::with_base_url("www.example.com", base, config).unwrap()
    }

    #[tokio::test]
    async fn test_hardened_site_earns_full_header_policy_points() {
        let server = mock_site(SiteProfile::Hardened).await;
        let report = scanner(&server).run_full_scan().await;

        let score = |name: &str| report.check(name).unwrap().score;
        assert_eq!(score("headers"), 15.0);
        assert_eq!(score("csp"), 10.0);
        assert_eq!(score("cache"), 10.0);
        assert_eq!(score("cors"), 10.0);
        assert_eq!(score("compression"), 5.0);
        assert_eq!(score("ddos"), 5.0);
        assert_eq!(score("disclosure"), 10.0);
        assert_eq!(score("rate-limit"), 3.0);
        // plain HTTP: no TLS handshake and no upgrade redirect
        assert_eq!(score("ssl"), 0.0);

        assert_eq!(report.max_score, 100.0);
        assert!(report.percentage > 60.0 && report.percentage < 80.0);
        assert_eq!(report.grade, Grade::from_percentage(report.percentage));
        assert!(!report.passed);
    }

    #[tokio::test]
    async fn test_bare_site_exposes_files_and_stack() {
        let server = mock_site(SiteProfile::Bare).await;
        let report = scanner(&server).run_full_scan().await;

        let disclosure = report.check("disclosure").unwrap();
        assert_eq!(disclosure.score, 0.0);
        assert!(!disclosure.passed);
        assert!(
            report
                .vulnerabilities
                .iter()
                .any(|v| v.severity == Severity::Critical && v.description.contains(".env"))
        );
        assert!(
            report
                .vulnerabilities
                .iter()
                .any(|v| v.description.contains("x-powered-by"))
        );
        assert_eq!(report.check("headers").unwrap().score, 0.0);
        assert_eq!(report.grade, Grade::F);
        assert!(!report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_scan_report_is_written_with_timestamp() {
        let server = mock_site(SiteProfile::Hardened).await;
        let report = scanner(&server).run_full_scan().await;

        let dir = tempfile::tempdir().unwrap();
        let path = report.save(dir.path()).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("security-scan-"));
        assert!(name.ends_with(".json"));

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["domain"], "www.example.com");
        assert_eq!(saved["checks"].as_array().unwrap().len(), 10);
    }
}
