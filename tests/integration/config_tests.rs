//! Configuration loading and validation tests

#[cfg(test)]
mod tests {
    use cdn_deploy::config::Config;
    use cdn_deploy::utils::error::CdnError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_override_file_takes_precedence() {
        let file = yaml_file(
            r#"
deployment:
  provider: fastly
  domain: cdn.example.org
security:
  threshold: 65
monitoring:
  thresholds:
    response_time_ms: 750
  regions: [eu-west, us-east]
"#,
        );

        let config = crate::assert_ok!(Config::load(Some(file.path())).await);
        assert_eq!(config.deployment.provider, "fastly");
        assert_eq!(config.deployment.domain, "cdn.example.org");
        assert_eq!(config.security.threshold, 65.0);
        assert_eq!(config.monitoring.thresholds.response_time_ms, 750.0);
        assert_eq!(config.monitoring.regions, vec!["eu-west", "us-east"]);
        // untouched sections keep their defaults
        assert_eq!(config.security.max_redirect_depth, 10);
        assert_eq!(config.monitoring.thresholds.availability, 99.0);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = tokio_test::assert_err!(tokio_test::block_on(Config::load(Some(&missing))));
        assert!(matches!(err, CdnError::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_override_is_rejected() {
        let file = yaml_file("security:\n  threshold: [not, a, number]\n");
        assert!(Config::load(Some(file.path())).await.is_err());
    }

    #[test]
    fn test_validation_reports_the_failing_section() {
        let mut config = Config::default();
        config.deployment.domain = "www.example.com".to_string();
        assert!(config.validate().is_ok());

        config.security.threshold = 120.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CdnError::Validation(_)));
        assert!(err.to_string().contains("Security config error"));

        config.security.threshold = 80.0;
        config.monitoring.sub_paths = vec!["index.html".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Monitoring config error"));
    }

    #[test]
    fn test_webhook_must_be_http() {
        let mut config = Config::default();
        config.deployment.domain = "www.example.com".to_string();
        config.deployment.webhook_url = Some("ftp://hooks.example.com/x".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WEBHOOK_URL"));
    }
}
