//! Vercel provider implementation

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::info;

use super::config::VercelConfig;
use super::manifest::{MANIFEST_FILE_NAME, render_vercel_json};
use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::shared::{
    build_client, require_credential, send_json, timed_health_check, write_artifact,
};
use crate::core::providers::types::*;
use crate::core::providers::CdnProvider;
use crate::utils::net::client::HEALTH_CHECK_TIMEOUT;

const PROVIDER: &str = "vercel";

/// Vercel adapter
#[derive(Debug, Clone)]
pub struct VercelProvider {
    config: VercelConfig,
    layout: SiteLayout,
    client: Client,
}

impl VercelProvider {
    pub fn new(config: VercelConfig, layout: SiteLayout) -> ProviderResult<Self> {
        let client = build_client(PROVIDER, config.timeout())?;
        Ok(Self {
            config,
            layout,
            client,
        })
    }

    fn credentials(&self) -> ProviderResult<(&str, &str)> {
        let token = require_credential(PROVIDER, "VERCEL_TOKEN", self.config.token.as_deref())?;
        let project = require_credential(PROVIDER, "VERCEL_PROJECT_ID", self.config.project_id.as_deref())?;
        Ok((token, project))
    }

    /// Authenticated request scoped to the team when one is configured
    fn api(&self, method: reqwest::Method, path: &str, token: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.config.get_api_base(), path))
            .bearer_auth(token);
        if let Some(team) = &self.config.team_id {
            request = request.query(&[("teamId", team)]);
        }
        request
    }

    async fn latest_deployments(&self, limit: &str) -> ProviderResult<Vec<Value>> {
        let (token, project) = self.credentials()?;
        let body = send_json(
            PROVIDER,
            self.api(reqwest::Method::GET, "/v6/deployments", token)
                .query(&[("projectId", project), ("limit", limit)]),
        )
        .await?;
        Ok(body["deployments"].as_array().cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CdnProvider for VercelProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate_config(&self, policy: &EdgePolicy) -> ProviderResult<ProviderConfig> {
        let manifest = render_vercel_json(policy)?;
        let payload = json!({
            "domain": policy.domain,
            "manifest": MANIFEST_FILE_NAME,
            "working_dir": self.layout.working_dir,
        });
        Ok(ProviderConfig::new(PROVIDER, payload).with_artifact(MANIFEST_FILE_NAME, manifest))
    }

    async fn validate(&self) -> ProviderResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let has_token = report.require("VERCEL_TOKEN", self.config.token.as_deref());
        report.require("VERCEL_PROJECT_ID", self.config.project_id.as_deref());
        if self.config.deploy_hook.is_none() {
            report.warning("VERCEL_DEPLOY_HOOK is not set; the latest deployment will be redeployed through the API");
        }

        if has_token {
            let token = self.config.token.as_deref().unwrap_or_default();
            if let Err(e) = send_json(PROVIDER, self.api(reqwest::Method::GET, "/v2/user", token)).await {
                report.error(format!("Vercel API check failed: {}", e));
            }
        }

        Ok(report)
    }

    async fn deploy(&self, config: &ProviderConfig) -> ProviderResult<DeploymentOutcome> {
        let manifest = config.artifact(MANIFEST_FILE_NAME).ok_or_else(|| {
            ProviderError::configuration(PROVIDER, "Generated configuration has no vercel.json")
        })?;
        let backup = write_artifact(PROVIDER, &self.layout.working_dir, manifest).await?;
        info!(dir = %self.layout.working_dir.display(), "Wrote vercel.json");

        let (trigger, deployment_id, url) = match self.config.deploy_hook.as_deref() {
            Some(hook) => {
                let job = send_json(PROVIDER, self.client.post(hook)).await?;
                let id = job.pointer("/job/id").and_then(Value::as_str).map(str::to_string);
                ("deploy_hook", id, None)
            }
            None => {
                let (token, project) = self.credentials()?;
                let latest = self.latest_deployments("1").await?;
                let previous = latest
                    .first()
                    .and_then(|d| d["uid"].as_str())
                    .ok_or_else(|| {
                        ProviderError::api_error(PROVIDER, 404, "Project has no deployment to redeploy")
                    })?;

                let created = send_json(
                    PROVIDER,
                    self.api(reqwest::Method::POST, "/v13/deployments", token)
                        .json(&json!({
                            "name": project,
                            "deploymentId": previous,
                            "target": "production",
                        })),
                )
                .await?;
                let id = created["id"].as_str().map(str::to_string);
                let url = created["url"].as_str().map(|u| format!("https://{}", u));
                ("api", id, url)
            }
        };
        info!(trigger, "Triggered Vercel deployment");

        Ok(DeploymentOutcome {
            provider: PROVIDER.to_string(),
            deployment_id,
            url: url.or_else(|| config.payload["domain"].as_str().map(|d| format!("https://{}", d))),
            metadata: json!({
                "trigger": trigger,
                "manifest": self.layout.working_dir.join(MANIFEST_FILE_NAME),
                "backup": backup,
            }),
        })
    }

    async fn health_check(&self) -> ProviderResult<HealthCheckResult> {
        let (token, project) = self.credentials()?;
        let request = self
            .api(reqwest::Method::GET, &format!("/v9/projects/{}", project), token)
            .timeout(HEALTH_CHECK_TIMEOUT);
        let mut result = timed_health_check(PROVIDER, request, HEALTH_CHECK_TIMEOUT / 2).await?;
        let name = result
            .details
            .as_ref()
            .and_then(|d| d["name"].as_str())
            .map(str::to_string);
        result.details = Some(json!({"project": name}));
        Ok(result)
    }

    async fn monitor(&self) -> ProviderResult<ProviderSnapshot> {
        let deployments = self.latest_deployments("5").await?;
        let latest = deployments.first().cloned().unwrap_or(Value::Null);
        let status = latest["readyState"]
            .as_str()
            .or_else(|| latest["state"].as_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(ProviderSnapshot {
            provider: PROVIDER.to_string(),
            status,
            data: json!({
                "latest": latest,
                "recent": deployments.len(),
            }),
        })
    }
}
