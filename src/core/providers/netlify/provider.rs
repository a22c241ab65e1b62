//! Netlify provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use super::config::NetlifyConfig;
use super::manifest::{MANIFEST_FILE_NAME, render_netlify_toml};
use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::shared::{
    build_client, require_credential, send_json, timed_health_check, write_artifact,
};
use crate::core::providers::types::*;
use crate::core::providers::CdnProvider;
use crate::utils::net::client::HEALTH_CHECK_TIMEOUT;

const PROVIDER: &str = "netlify";

/// Netlify adapter
#[derive(Debug, Clone)]
pub struct NetlifyProvider {
    config: NetlifyConfig,
    layout: SiteLayout,
    client: Client,
}

impl NetlifyProvider {
    pub fn new(config: NetlifyConfig, layout: SiteLayout) -> ProviderResult<Self> {
        let client = build_client(PROVIDER, config.timeout())?;
        Ok(Self {
            config,
            layout,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.config.get_api_base(), path)
    }

    fn credentials(&self) -> ProviderResult<(&str, &str)> {
        let token = require_credential(PROVIDER, "NETLIFY_AUTH_TOKEN", self.config.auth_token.as_deref())?;
        let site = require_credential(PROVIDER, "NETLIFY_SITE_ID", self.config.site_id.as_deref())?;
        Ok((token, site))
    }
}

#[async_trait]
impl CdnProvider for NetlifyProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate_config(&self, policy: &EdgePolicy) -> ProviderResult<ProviderConfig> {
        let manifest = render_netlify_toml(policy, &self.layout)?;
        let payload = json!({
            "domain": policy.domain,
            "manifest": MANIFEST_FILE_NAME,
            "working_dir": self.layout.working_dir,
        });
        Ok(ProviderConfig::new(PROVIDER, payload).with_artifact(MANIFEST_FILE_NAME, manifest))
    }

    async fn validate(&self) -> ProviderResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let has_token = report.require("NETLIFY_AUTH_TOKEN", self.config.auth_token.as_deref());
        let has_site = report.require("NETLIFY_SITE_ID", self.config.site_id.as_deref());
        if self.config.build_hook.is_none() {
            report.warning("NETLIFY_BUILD_HOOK is not set; builds will be triggered through the API");
        }

        if has_token {
            let path = match (has_site, self.config.site_id.as_deref()) {
                (true, Some(site)) => format!("/sites/{}", site),
                _ => "/user".to_string(),
            };
            let token = self.config.auth_token.as_deref().unwrap_or_default();
            if let Err(e) = send_json(PROVIDER, self.client.get(self.url(&path)).bearer_auth(token)).await {
                report.error(format!("Netlify API check failed: {}", e));
            }
        }

        Ok(report)
    }

    async fn deploy(&self, config: &ProviderConfig) -> ProviderResult<DeploymentOutcome> {
        let manifest = config.artifact(MANIFEST_FILE_NAME).ok_or_else(|| {
            ProviderError::configuration(PROVIDER, "Generated configuration has no netlify.toml")
        })?;
        let backup = write_artifact(PROVIDER, &self.layout.working_dir, manifest).await?;
        info!(dir = %self.layout.working_dir.display(), "Wrote netlify.toml");

        let (trigger, deployment_id) = match self.config.build_hook.as_deref() {
            Some(hook) => {
                send_json(PROVIDER, self.client.post(hook).json(&json!({}))).await?;
                ("build_hook", None)
            }
            None => {
                let (token, site) = self.credentials()?;
                let build = send_json(
                    PROVIDER,
                    self.client
                        .post(self.url(&format!("/sites/{}/builds", site)))
                        .bearer_auth(token),
                )
                .await?;
                let id = build["deploy_id"]
                    .as_str()
                    .or_else(|| build["id"].as_str())
                    .map(str::to_string);
                ("api", id)
            }
        };
        info!(trigger, "Triggered Netlify build");

        Ok(DeploymentOutcome {
            provider: PROVIDER.to_string(),
            deployment_id,
            url: config.payload["domain"].as_str().map(|d| format!("https://{}", d)),
            metadata: json!({
                "trigger": trigger,
                "manifest": self.layout.working_dir.join(MANIFEST_FILE_NAME),
                "backup": backup,
            }),
        })
    }

    async fn health_check(&self) -> ProviderResult<HealthCheckResult> {
        let (token, site) = self.credentials()?;
        let request = self
            .client
            .get(self.url(&format!("/sites/{}", site)))
            .bearer_auth(token)
            .timeout(HEALTH_CHECK_TIMEOUT);
        let mut result = timed_health_check(PROVIDER, request, HEALTH_CHECK_TIMEOUT / 2).await?;
        let state = result
            .details
            .as_ref()
            .and_then(|d| d["state"].as_str())
            .map(str::to_string);
        if matches!(state.as_deref(), Some(s) if s != "current") {
            result.status = HealthStatus::Degraded;
        }
        result.details = Some(json!({"state": state}));
        Ok(result)
    }

    async fn monitor(&self) -> ProviderResult<ProviderSnapshot> {
        let (token, site) = self.credentials()?;
        let deploys = send_json(
            PROVIDER,
            self.client
                .get(self.url(&format!("/sites/{}/deploys", site)))
                .query(&[("per_page", "1")])
                .bearer_auth(token),
        )
        .await?;

        let latest = deploys.get(0).cloned().unwrap_or(Value::Null);
        Ok(ProviderSnapshot {
            provider: PROVIDER.to_string(),
            status: latest["state"].as_str().unwrap_or("unknown").to_string(),
            data: json!({
                "deploy_id": latest["id"],
                "created_at": latest["created_at"],
                "deploy_url": latest["deploy_ssl_url"],
                "error_message": latest["error_message"],
            }),
        })
    }
}
