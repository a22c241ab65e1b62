//! Vendor adapter tests against mocked APIs
//!
//! Each test points one adapter's API base at a `MockServer` and drives it
//! through the manager, as the deploy pipeline does.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, registry_for};
    use cdn_deploy::core::providers::{HealthStatus, ProviderError};
    use cdn_deploy::{CdnError, CdnManager, DeployOptions};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEPLOY: DeployOptions = DeployOptions {
        dry_run: false,
        force: false,
    };

    // ==================== Fastly ====================

    #[tokio::test]
    async fn test_fastly_clones_uploads_and_activates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokens/self"))
            .and(header("Fastly-Key", "fastly-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "tok"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/service/svc-1/details"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"active_version": {"number": 3}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/service/svc-1/version/3/clone"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"number": 4})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/service/svc-1/version/4/snippet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1..)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/service/svc-1/version/4/activate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigFactory::against("fastly", dir.path(), &server.uri());
        config.providers.fastly.api_token = Some("fastly-token".to_string());
        config.providers.fastly.service_id = Some("svc-1".to_string());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let result = crate::assert_ok!(manager.deploy(DEPLOY).await);
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.deployment_id.as_deref(), Some("svc-1/4"));
        assert_eq!(outcome.url.as_deref(), Some("https://www.example.com"));
        assert_eq!(outcome.metadata["previous_version"], 3);
    }

    #[tokio::test]
    async fn test_fastly_activation_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokens/self"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/service/svc-1/details"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"active_version": {"number": 1}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/service/svc-1/version/1/clone"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"msg": "clone is broken"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigFactory::against("fastly", dir.path(), &server.uri());
        config.providers.fastly.api_token = Some("fastly-token".to_string());
        config.providers.fastly.service_id = Some("svc-1".to_string());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let err = crate::assert_err!(manager.deploy(DEPLOY).await);
        match err {
            CdnError::Provider(ProviderError::ApiError { status, message, .. }) => {
                assert_eq!(status, 500);
                assert!(message.contains("clone is broken"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    // ==================== Netlify ====================

    #[tokio::test]
    async fn test_netlify_writes_manifest_and_calls_build_hook() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sites/site-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "current"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/build_hooks/abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigFactory::against("netlify", dir.path(), &server.uri());
        config.providers.netlify.auth_token = Some("netlify-token".to_string());
        config.providers.netlify.site_id = Some("site-1".to_string());
        config.providers.netlify.build_hook = Some(format!("{}/build_hooks/abc", server.uri()));
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let first = manager.deploy(DEPLOY).await.unwrap();
        let outcome = first.outcome.unwrap();
        assert_eq!(outcome.metadata["trigger"], "build_hook");
        assert!(outcome.metadata["backup"].is_null());

        let manifest = std::fs::read_to_string(dir.path().join("netlify.toml")).unwrap();
        assert!(manifest.contains("[[headers]]"));
        assert!(manifest.contains("[[redirects]]"));

        // a second deploy keeps the previous manifest as a backup
        let second = manager.deploy(DEPLOY).await.unwrap();
        let backup = second.outcome.unwrap().metadata["backup"].clone();
        assert!(backup.as_str().unwrap().contains("netlify.toml.backup."));
    }

    #[tokio::test]
    async fn test_netlify_health_reports_degraded_deploy_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sites/site-1"))
            .and(header("authorization", "Bearer netlify-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "building"})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigFactory::against("netlify", dir.path(), &server.uri());
        config.providers.netlify.auth_token = Some("netlify-token".to_string());
        config.providers.netlify.site_id = Some("site-1".to_string());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let health = manager.health_check().await.unwrap();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.details, Some(json!({"state": "building"})));
    }

    // ==================== Vercel ====================

    #[tokio::test]
    async fn test_vercel_redeploys_latest_deployment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {}})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v6/deployments"))
            .and(query_param("projectId", "prj-1"))
            .and(query_param("teamId", "team-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"deployments": [{"uid": "dpl_old", "readyState": "READY"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v13/deployments"))
            .and(body_partial_json(json!({"deploymentId": "dpl_old", "target": "production"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "dpl_new", "url": "site-abc.vercel.app"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigFactory::against("vercel", dir.path(), &server.uri());
        config.providers.vercel.token = Some("vercel-token".to_string());
        config.providers.vercel.project_id = Some("prj-1".to_string());
        config.providers.vercel.team_id = Some("team-1".to_string());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let result = manager.deploy(DEPLOY).await.unwrap();
        assert_eq!(result.warnings.len(), 1, "missing deploy hook is a warning");
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.deployment_id.as_deref(), Some("dpl_new"));
        assert_eq!(outcome.url.as_deref(), Some("https://site-abc.vercel.app"));

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("vercel.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["cleanUrls"], true);

        let snapshot = manager.monitor().await.unwrap();
        assert_eq!(snapshot.status, "READY");
    }

    #[tokio::test]
    async fn test_vercel_rejected_token_is_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v9/projects/prj-1"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"error": {"code": "forbidden", "message": "Not authorized"}})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigFactory::against("vercel", dir.path(), &server.uri());
        config.providers.vercel.token = Some("stale".to_string());
        config.providers.vercel.project_id = Some("prj-1".to_string());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let err = crate::assert_err!(manager.health_check().await);
        assert!(matches!(
            err,
            CdnError::Provider(ProviderError::Authentication { provider: "vercel", .. })
        ));
    }

    // ==================== Fallback chain ====================

    #[tokio::test]
    async fn test_fallback_chain_reports_each_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v9/projects/prj-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "site"})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("offline");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(local.join("index.html"), "<h1>offline</h1>").unwrap();

        let mut config = ConfigFactory::against("vercel", dir.path(), &server.uri());
        config.providers.vercel.token = Some("vercel-token".to_string());
        config.providers.vercel.project_id = Some("prj-1".to_string());
        config.deployment.fallback.provider = Some("netlify".to_string());
        config.deployment.fallback.local_path = Some(local.clone());
        let manager = CdnManager::new(config.clone(), registry_for(&config)).unwrap();

        let report = manager.test_fallback().await;
        assert!(report.primary.available);
        assert_eq!(report.primary.status, Some(HealthStatus::Healthy));

        let secondary = report.secondary.as_ref().unwrap();
        assert_eq!(secondary.provider, "netlify");
        assert!(!secondary.available);
        assert!(secondary.error.as_deref().unwrap().contains("NETLIFY_AUTH_TOKEN"));

        let local_report = report.local.as_ref().unwrap();
        assert_eq!(local_report.path, local);
        assert!(local_report.available);
        assert!(report.any_available());
    }
}
