//! CDN manager tests with the built-in adapters

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, registry_for};
    use cdn_deploy::core::providers::SUPPORTED_PROVIDERS;
    use cdn_deploy::{CdnError, CdnManager, DeployOptions};

    #[tokio::test]
    async fn test_dry_run_matches_generated_config_for_every_provider() {
        let dir = tempfile::tempdir().unwrap();
        for provider in SUPPORTED_PROVIDERS {
            // no credentials and no reachable API: a dry run must not care
            let config = ConfigFactory::against(provider, dir.path(), "http://127.0.0.1:9");
            let manager = crate::assert_ok!(CdnManager::new(config.clone(), registry_for(&config)));

            let result = manager
                .deploy(DeployOptions {
                    dry_run: true,
                    force: false,
                })
                .await
                .unwrap_or_else(|e| panic!("{} dry run failed: {}", provider, e));

            assert!(result.success);
            assert!(result.dry_run);
            assert!(result.outcome.is_none());
            assert_eq!(result.provider, *provider);
            assert_eq!(result.config, manager.generate_provider_config().unwrap());
        }
        // dry runs never write vendor manifests
        assert!(!dir.path().join("netlify.toml").exists());
        assert!(!dir.path().join("vercel.json").exists());
    }

    #[test]
    fn test_unknown_provider_lists_available_ones() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFactory::quiet("akamai", dir.path());
        let err = crate::assert_err!(CdnManager::new(config.clone(), registry_for(&config)));
        match err {
            CdnError::ProviderNotFound(message) => {
                assert!(message.contains("akamai"));
                assert!(message.contains("cloudflare"));
                assert!(message.contains("vercel"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_headers_carry_the_serialized_csp() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFactory::quiet("cloudflare", dir.path());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let headers = manager.generate_headers();
        assert_eq!(
            headers.get("Content-Security-Policy"),
            Some(&manager.generate_csp_header())
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Origin").map(String::as_str),
            Some("https://www.example.com")
        );
        assert_eq!(manager.edge_policy().headers, headers);
    }

    #[tokio::test]
    async fn test_missing_credentials_are_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFactory::against("netlify", dir.path(), "http://127.0.0.1:9");
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let report = manager.validate_configuration().await.unwrap();
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("NETLIFY_AUTH_TOKEN")));
        assert!(report.errors.iter().any(|e| e.contains("NETLIFY_SITE_ID")));

        let err = crate::assert_err!(
            manager
                .deploy(DeployOptions {
                    dry_run: false,
                    force: false,
                })
                .await
        );
        assert!(matches!(err, CdnError::Validation(_)));
    }
}
