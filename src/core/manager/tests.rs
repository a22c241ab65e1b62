//! Manager tests against mocked adapters

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::core::providers::{
        HealthStatus, MockCdnProvider, ProviderError, ValidationReport,
    };
    use serde_json::json;

    fn config(provider: &str) -> Config {
        let mut config = Config::default();
        config.deployment.provider = provider.to_string();
        config.deployment.domain = "example.com".to_string();
        config
    }

    fn registry_with(mock: MockCdnProvider) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(mock));
        registry
    }

    fn named_mock(name: &'static str) -> MockCdnProvider {
        let mut mock = MockCdnProvider::new();
        mock.expect_name().return_const(name);
        mock
    }

    fn valid_report() -> ValidationReport {
        ValidationReport::new()
    }

    #[test]
    fn test_unknown_provider_fails_without_io() {
        let mut mock = named_mock("mock");
        mock.expect_validate().times(0);
        mock.expect_health_check().times(0);
        mock.expect_deploy().times(0);

        let result = CdnManager::new(config("akamai"), registry_with(mock));
        assert!(matches!(result, Err(CdnError::ProviderNotFound(name)) if name.contains("akamai")));
    }

    #[tokio::test]
    async fn test_invalid_validation_aborts_before_config_generation() {
        let mut mock = named_mock("mock");
        mock.expect_validate().times(1).returning(|| {
            Ok(ValidationReport {
                valid: false,
                errors: vec!["missing token".to_string()],
                warnings: vec![],
            })
        });
        mock.expect_generate_config().times(0);
        mock.expect_deploy().times(0);

        let manager = CdnManager::new(config("mock"), registry_with(mock)).unwrap();
        let err = manager
            .deploy(DeployOptions {
                dry_run: false,
                force: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CdnError::Validation(_)));
        assert!(err.to_string().contains("missing token"));
    }

    #[tokio::test]
    async fn test_force_overrides_invalid_validation() {
        let mut mock = named_mock("mock");
        mock.expect_validate().returning(|| {
            Ok(ValidationReport {
                valid: false,
                errors: vec!["missing token".to_string()],
                warnings: vec![],
            })
        });
        mock.expect_generate_config()
            .returning(|policy| Ok(ProviderConfig::new("mock", json!({"domain": policy.domain}))));
        mock.expect_deploy().times(1).returning(|config| {
            let mut outcome = DeploymentOutcome::new("mock");
            outcome.deployment_id = Some("dep-1".to_string());
            outcome.metadata = config.payload.clone();
            Ok(outcome)
        });

        let manager = CdnManager::new(config("mock"), registry_with(mock)).unwrap();
        let result = manager
            .deploy(DeployOptions {
                dry_run: false,
                force: true,
            })
            .await
            .unwrap();

        assert!(result.success);
        assert!(!result.dry_run);
        assert_eq!(result.warnings, vec!["missing token".to_string()]);
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.deployment_id.as_deref(), Some("dep-1"));
        assert_eq!(outcome.metadata, json!({"domain": "example.com"}));
    }

    #[tokio::test]
    async fn test_dry_run_returns_generated_config_without_network() {
        let mut mock = named_mock("mock");
        mock.expect_validate().times(0);
        mock.expect_deploy().times(0);
        mock.expect_health_check().times(0);
        mock.expect_generate_config()
            .returning(|policy| Ok(ProviderConfig::new("mock", json!({"headers": policy.headers.len()}))));

        let manager = CdnManager::new(config("mock"), registry_with(mock)).unwrap();
        let result = manager
            .deploy(DeployOptions {
                dry_run: true,
                force: false,
            })
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.dry_run);
        assert!(result.outcome.is_none());
        assert_eq!(result.config, manager.generate_provider_config().unwrap());
    }

    #[tokio::test]
    async fn test_adapter_deploy_failure_propagates() {
        let mut mock = named_mock("mock");
        mock.expect_validate().returning(|| Ok(valid_report()));
        mock.expect_generate_config()
            .returning(|_| Ok(ProviderConfig::new("mock", json!({}))));
        mock.expect_deploy()
            .returning(|_| Err(ProviderError::api_error("mock", 500, "upstream exploded")));

        let manager = CdnManager::new(config("mock"), registry_with(mock)).unwrap();
        let err = manager.deploy(DeployOptions::default()).await.unwrap_err();
        assert!(matches!(err, CdnError::Provider(_)));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_validate_configuration_merges_settings_and_adapter() {
        let mut mock = named_mock("mock");
        mock.expect_validate().returning(|| {
            let mut report = ValidationReport::new();
            report.warning("no worker");
            Ok(report)
        });

        let mut cfg = config("mock");
        cfg.deployment.domain = String::new();
        let manager = CdnManager::new(cfg, registry_with(mock)).unwrap();
        let report = manager.validate_configuration().await.unwrap();

        assert!(!report.valid);
        assert!(report.errors[0].contains("DOMAIN"));
        assert_eq!(report.warnings, vec!["no worker".to_string()]);
    }

    #[test]
    fn test_edge_policy_carries_headers_and_rules() {
        let manager = CdnManager::new(config("mock"), registry_with(named_mock("mock"))).unwrap();
        let policy = manager.edge_policy();
        assert_eq!(policy.domain, "example.com");
        assert!(policy.headers["Content-Security-Policy"].contains("default-src 'self'"));
        assert_eq!(policy.cache_rules, manager.config().policy.cache_rules);
        assert!(manager.generate_csp_header().contains("default-src 'self'"));
    }

    #[tokio::test]
    async fn test_fallback_report_never_fails() {
        let mut primary = named_mock("primary");
        primary
            .expect_health_check()
            .returning(|| Err(ProviderError::network("primary", "connection refused")));

        let mut secondary = named_mock("secondary");
        secondary.expect_health_check().returning(|| {
            Ok(HealthCheckResult {
                provider: "secondary".to_string(),
                status: HealthStatus::Healthy,
                response_time_ms: 12.0,
                details: None,
            })
        });

        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config("primary");
        cfg.deployment.fallback.provider = Some("secondary".to_string());
        cfg.deployment.fallback.local_path = Some(dir.path().to_path_buf());

        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(primary));
        registry.register(Arc::new(secondary));

        let manager = CdnManager::new(cfg, registry).unwrap();
        let report = manager.test_fallback().await;

        assert!(!report.primary.available);
        assert!(report.primary.error.as_deref().unwrap().contains("connection refused"));
        let secondary = report.secondary.as_ref().unwrap();
        assert!(secondary.available);
        assert_eq!(secondary.status, Some(HealthStatus::Healthy));
        assert!(report.local.as_ref().unwrap().available);
        assert!(report.any_available());
    }

    #[tokio::test]
    async fn test_fallback_with_unregistered_secondary_and_missing_path() {
        let mut primary = named_mock("primary");
        primary
            .expect_health_check()
            .returning(|| Err(ProviderError::timeout("primary", "deadline exceeded")));

        let mut cfg = config("primary");
        cfg.deployment.fallback.provider = Some("nowhere".to_string());
        cfg.deployment.fallback.local_path = Some("/definitely/not/here".into());

        let manager = CdnManager::new(cfg, registry_with(primary)).unwrap();
        let report = manager.test_fallback().await;

        assert!(!report.secondary.as_ref().unwrap().available);
        assert!(!report.local.as_ref().unwrap().available);
        assert!(!report.any_available());
    }

    #[test]
    fn test_for_provider_switches_adapter() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(named_mock("one")));
        registry.register(Arc::new(named_mock("two")));

        let manager = CdnManager::new(config("one"), registry).unwrap();
        let other = manager.for_provider("two").unwrap();
        assert_eq!(other.provider_name(), "two");
        assert!(manager.for_provider("three").is_err());
    }
}
