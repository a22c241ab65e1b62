//! Fastly provider implementation
//!
//! Deploying clones the active service version, uploads the VCL snippets to
//! the clone and activates it.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::info;

use super::config::FastlyConfig;
use super::vcl::{VclSnippet, generate_snippets};
use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::shared::{build_client, require_credential, send_json, timed_health_check};
use crate::core::providers::types::*;
use crate::core::providers::CdnProvider;
use crate::utils::net::client::HEALTH_CHECK_TIMEOUT;

const PROVIDER: &str = "fastly";

/// Fastly adapter
#[derive(Debug, Clone)]
pub struct FastlyProvider {
    config: FastlyConfig,
    client: Client,
}

impl FastlyProvider {
    pub fn new(config: FastlyConfig) -> ProviderResult<Self> {
        let client = build_client(PROVIDER, config.timeout())?;
        Ok(Self { config, client })
    }

    fn authed(&self, request: RequestBuilder) -> ProviderResult<RequestBuilder> {
        let token = require_credential(PROVIDER, "FASTLY_API_TOKEN", self.config.api_token.as_deref())?;
        Ok(request
            .header("Fastly-Key", token)
            .header("Accept", "application/json"))
    }

    fn service_id(&self) -> ProviderResult<&str> {
        require_credential(PROVIDER, "FASTLY_SERVICE_ID", self.config.service_id.as_deref())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.get_api_base(), path)
    }

    async fn active_version(&self, service_id: &str) -> ProviderResult<u64> {
        let details = send_json(
            PROVIDER,
            self.authed(self.client.get(self.url(&format!("/service/{}/details", service_id))))?,
        )
        .await?;

        details
            .pointer("/active_version/number")
            .and_then(Value::as_u64)
            .or_else(|| {
                details["versions"].as_array().and_then(|versions| {
                    versions
                        .iter()
                        .filter(|v| v["active"].as_bool() == Some(true))
                        .filter_map(|v| v["number"].as_u64())
                        .max()
                })
            })
            .ok_or_else(|| ProviderError::api_error(PROVIDER, 200, "Service has no active version"))
    }
}

#[async_trait]
impl CdnProvider for FastlyProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate_config(&self, policy: &EdgePolicy) -> ProviderResult<ProviderConfig> {
        let snippets = generate_snippets(policy);
        let vcl: String = snippets
            .iter()
            .map(|s| format!("# {} ({})\n{}\n", s.name, s.kind, s.content))
            .collect();

        let payload = json!({
            "domain": policy.domain,
            "snippets": snippets,
            "gzip": policy.optimization.brotli,
        });
        Ok(ProviderConfig::new(PROVIDER, payload).with_artifact("fastly-snippets.vcl", vcl))
    }

    async fn validate(&self) -> ProviderResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let has_token = report.require("FASTLY_API_TOKEN", self.config.api_token.as_deref());
        report.require("FASTLY_SERVICE_ID", self.config.service_id.as_deref());

        if has_token {
            let request = self.authed(self.client.get(self.url("/tokens/self")))?;
            if let Err(e) = send_json(PROVIDER, request).await {
                report.error(format!("Fastly token check failed: {}", e));
            }
        }

        Ok(report)
    }

    async fn deploy(&self, config: &ProviderConfig) -> ProviderResult<DeploymentOutcome> {
        let service_id = self.service_id()?;
        let snippets: Vec<VclSnippet> = serde_json::from_value(
            config.payload.get("snippets").cloned().unwrap_or_else(|| json!([])),
        )
        .map_err(|e| ProviderError::serialization(PROVIDER, e.to_string()))?;

        let active = self.active_version(service_id).await?;
        let cloned = send_json(
            PROVIDER,
            self.authed(self.client.put(self.url(&format!(
                "/service/{}/version/{}/clone",
                service_id, active
            ))))?,
        )
        .await?;
        let version = cloned["number"]
            .as_u64()
            .ok_or_else(|| ProviderError::api_error(PROVIDER, 200, "Clone response has no version number"))?;
        info!(service_id, from = active, to = version, "Cloned Fastly service version");

        for snippet in &snippets {
            send_json(
                PROVIDER,
                self.authed(
                    self.client
                        .post(self.url(&format!("/service/{}/version/{}/snippet", service_id, version)))
                        .json(snippet),
                )?,
            )
            .await?;
        }

        send_json(
            PROVIDER,
            self.authed(self.client.put(self.url(&format!(
                "/service/{}/version/{}/activate",
                service_id, version
            ))))?,
        )
        .await?;
        info!(service_id, version, "Activated Fastly service version");

        Ok(DeploymentOutcome {
            provider: PROVIDER.to_string(),
            deployment_id: Some(format!("{}/{}", service_id, version)),
            url: config.payload["domain"].as_str().map(|d| format!("https://{}", d)),
            metadata: json!({
                "service_id": service_id,
                "previous_version": active,
                "version": version,
                "snippets": snippets.len(),
            }),
        })
    }

    async fn health_check(&self) -> ProviderResult<HealthCheckResult> {
        let service_id = self.service_id()?;
        let request = self
            .authed(self.client.get(self.url(&format!("/service/{}/details", service_id))))?
            .timeout(HEALTH_CHECK_TIMEOUT);
        let mut result = timed_health_check(PROVIDER, request, HEALTH_CHECK_TIMEOUT / 2).await?;
        let active = result
            .details
            .as_ref()
            .and_then(|d| d.pointer("/active_version/number"))
            .cloned();
        if active.is_none() {
            result.status = HealthStatus::Degraded;
        }
        result.details = Some(json!({"active_version": active}));
        Ok(result)
    }

    async fn monitor(&self) -> ProviderResult<ProviderSnapshot> {
        let service_id = self.service_id()?;
        let stats = send_json(
            PROVIDER,
            self.authed(
                self.client
                    .get(self.url(&format!("/stats/service/{}", service_id)))
                    .query(&[("from", "1 day ago"), ("by", "day")]),
            )?,
        )
        .await?;

        Ok(ProviderSnapshot {
            provider: PROVIDER.to_string(),
            status: stats["status"].as_str().unwrap_or("success").to_string(),
            data: stats.get("data").cloned().unwrap_or(stats),
        })
    }
}
