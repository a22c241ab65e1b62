//! Cloudflare provider implementation
//!
//! Deploys zone settings, one page rule per cache rule and, when an account
//! ID is configured, an edge worker with its route.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::config::CloudflareConfig;
use super::worker::{WORKER_FILE_NAME, render_worker_script};
use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::shared::{build_client, require_credential, send_json, timed_health_check};
use crate::core::providers::types::*;
use crate::core::providers::CdnProvider;
use crate::utils::net::client::HEALTH_CHECK_TIMEOUT;

const PROVIDER: &str = "cloudflare";

/// Cloudflare adapter
#[derive(Debug, Clone)]
pub struct CloudflareProvider {
    config: CloudflareConfig,
    client: Client,
}

impl CloudflareProvider {
    pub fn new(config: CloudflareConfig) -> ProviderResult<Self> {
        let client = build_client(PROVIDER, config.timeout())?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.get_api_base(), path)
    }

    fn token(&self) -> ProviderResult<&str> {
        require_credential(PROVIDER, "CLOUDFLARE_API_TOKEN", self.config.api_token.as_deref())
    }

    fn zone_id(&self) -> ProviderResult<&str> {
        require_credential(PROVIDER, "CLOUDFLARE_ZONE_ID", self.config.zone_id.as_deref())
    }

    /// Send a request and unwrap the `{success, result, errors}` envelope
    async fn call(&self, request: reqwest::RequestBuilder) -> ProviderResult<Value> {
        let token = self.token()?;
        let body = send_json(PROVIDER, request.bearer_auth(token)).await?;
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(ProviderError::from_status(PROVIDER, 200, &body.to_string()));
        }
        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }

    fn zone_settings(policy: &EdgePolicy) -> Value {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        let opt = &policy.optimization;
        let transport = &policy.transport;
        json!([
            {"id": "ssl", "value": "strict"},
            {"id": "always_use_https", "value": on_off(transport.always_use_https)},
            {"id": "min_tls_version", "value": transport.min_tls_version},
            {"id": "brotli", "value": on_off(opt.brotli)},
            {"id": "minify", "value": {
                "css": on_off(opt.minify),
                "html": on_off(opt.minify),
                "js": on_off(opt.minify),
            }},
            {"id": "http2", "value": on_off(opt.http2)},
            {"id": "http3", "value": on_off(opt.http3)},
            {"id": "polish", "value": if opt.image_optimization { "lossless" } else { "off" }},
            {"id": "security_level", "value": if transport.waf { "medium" } else { "essentially_off" }},
            {"id": "security_header", "value": {"strict_transport_security": {
                "enabled": true,
                "max_age": transport.hsts_max_age,
                "include_subdomains": true,
                "preload": true,
                "nosniff": true,
            }}},
        ])
    }

    fn page_rules(policy: &EdgePolicy) -> Vec<Value> {
        policy
            .cache_rules
            .iter()
            .map(|rule| {
                let target = if rule.pattern.starts_with('/') {
                    format!("{}{}", policy.domain, rule.pattern)
                } else {
                    format!("{}/{}", policy.domain, rule.pattern)
                };
                let actions = if rule.bypass {
                    json!([{"id": "cache_level", "value": "bypass"}])
                } else {
                    json!([
                        {"id": "cache_level", "value": "cache_everything"},
                        {"id": "edge_cache_ttl", "value": rule.edge_ttl},
                        {"id": "browser_cache_ttl", "value": rule.browser_ttl},
                    ])
                };
                json!({
                    "targets": [{"target": "url", "constraint": {"operator": "matches", "value": target}}],
                    "actions": actions,
                    "status": "active",
                })
            })
            .collect()
    }
}

#[async_trait]
impl CdnProvider for CloudflareProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate_config(&self, policy: &EdgePolicy) -> ProviderResult<ProviderConfig> {
        let payload = json!({
            "zone_settings": Self::zone_settings(policy),
            "page_rules": Self::page_rules(policy),
            "worker": {
                "name": self.config.worker_name,
                "route": format!("{}/*", policy.domain),
            },
        });

        Ok(ProviderConfig::new(PROVIDER, payload)
            .with_artifact(WORKER_FILE_NAME, render_worker_script(policy)))
    }

    async fn validate(&self) -> ProviderResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let has_token = report.require("CLOUDFLARE_API_TOKEN", self.config.api_token.as_deref());
        report.require("CLOUDFLARE_ZONE_ID", self.config.zone_id.as_deref());
        if self.config.account_id.is_none() {
            report.warning("CLOUDFLARE_ACCOUNT_ID is not set; the edge worker will not be deployed");
        }

        if has_token {
            match self.call(self.client.get(self.url("/user/tokens/verify"))).await {
                Ok(result) => {
                    let status = result.get("status").and_then(Value::as_str).unwrap_or("unknown");
                    if status != "active" {
                        report.error(format!("Cloudflare API token status is '{}'", status));
                    }
                }
                Err(e) => report.error(format!("Cloudflare token verification failed: {}", e)),
            }
        }

        Ok(report)
    }

    async fn deploy(&self, config: &ProviderConfig) -> ProviderResult<DeploymentOutcome> {
        let zone_id = self.zone_id()?;
        let payload = &config.payload;

        let settings = payload.get("zone_settings").cloned().unwrap_or_else(|| json!([]));
        info!(zone_id, "Updating Cloudflare zone settings");
        self.call(
            self.client
                .patch(self.url(&format!("/zones/{}/settings", zone_id)))
                .json(&json!({"items": settings})),
        )
        .await?;

        let mut page_rule_ids = Vec::new();
        let rules = payload
            .get("page_rules")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for rule in &rules {
            let result = self
                .call(
                    self.client
                        .post(self.url(&format!("/zones/{}/pagerules", zone_id)))
                        .json(rule),
                )
                .await?;
            if let Some(id) = result.get("id").and_then(Value::as_str) {
                page_rule_ids.push(id.to_string());
            }
        }
        debug!(count = page_rule_ids.len(), "Created Cloudflare page rules");

        let mut worker = Value::Null;
        match (&self.config.account_id, config.artifact(WORKER_FILE_NAME)) {
            (Some(account_id), Some(script)) => {
                let name = &self.config.worker_name;
                info!(worker = %name, "Uploading Cloudflare edge worker");
                self.call(
                    self.client
                        .put(self.url(&format!("/accounts/{}/workers/scripts/{}", account_id, name)))
                        .header("Content-Type", "application/javascript")
                        .body(script.contents.clone()),
                )
                .await?;

                let route = payload
                    .pointer("/worker/route")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                self.call(
                    self.client
                        .post(self.url(&format!("/zones/{}/workers/routes", zone_id)))
                        .json(&json!({"pattern": route, "script": name})),
                )
                .await?;
                worker = json!({"name": name, "route": route});
            }
            (None, Some(_)) => warn!("Skipping Cloudflare worker upload: no account ID configured"),
            _ => {}
        }

        let domain = payload
            .pointer("/worker/route")
            .and_then(Value::as_str)
            .map(|r| r.trim_end_matches("/*").to_string());

        Ok(DeploymentOutcome {
            provider: PROVIDER.to_string(),
            deployment_id: Some(zone_id.to_string()),
            url: domain.map(|d| format!("https://{}", d)),
            metadata: json!({
                "settings_updated": true,
                "page_rules": page_rule_ids,
                "worker": worker,
            }),
        })
    }

    async fn health_check(&self) -> ProviderResult<HealthCheckResult> {
        let token = self.token()?;
        let zone_id = self.zone_id()?;
        let request = self
            .client
            .get(self.url(&format!("/zones/{}", zone_id)))
            .bearer_auth(token)
            .timeout(HEALTH_CHECK_TIMEOUT);
        let mut result = timed_health_check(PROVIDER, request, HEALTH_CHECK_TIMEOUT / 2).await?;

        // Zone lookups answer 200 even for paused zones
        let zone_status = result
            .details
            .as_ref()
            .and_then(|d| d.pointer("/result/status"))
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(status) = zone_status {
            if status != "active" {
                result.status = HealthStatus::Degraded;
            }
            result.details = Some(json!({"zone_status": status}));
        }
        Ok(result)
    }

    async fn monitor(&self) -> ProviderResult<ProviderSnapshot> {
        let zone_id = self.zone_id()?;
        let result = self
            .call(
                self.client
                    .get(self.url(&format!("/zones/{}/analytics/dashboard", zone_id)))
                    .query(&[("since", "-1440"), ("continuous", "true")]),
            )
            .await?;

        Ok(ProviderSnapshot {
            provider: PROVIDER.to_string(),
            status: "ok".to_string(),
            data: result.get("totals").cloned().unwrap_or(result),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::{CacheRule, OptimizationConfig, TransportSecurityConfig};
    use std::collections::BTreeMap;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new(CloudflareConfig {
            api_base: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn policy() -> EdgePolicy {
        EdgePolicy {
            domain: "example.com".to_string(),
            origin: None,
            fallback_origin: None,
            headers: BTreeMap::new(),
            cache_rules: vec![
                CacheRule::new("/assets/*", 86400, 3600),
                CacheRule {
                    bypass: true,
                    ..CacheRule::new("/api/*", 0, 0)
                },
            ],
            optimization: OptimizationConfig::default(),
            transport: TransportSecurityConfig::default(),
        }
    }

    #[test]
    fn test_generate_config_maps_policy() {
        let config = provider().generate_config(&policy()).unwrap();
        let payload = &config.payload;

        let settings = payload["zone_settings"].as_array().unwrap();
        assert!(settings.contains(&json!({"id": "ssl", "value": "strict"})));
        assert!(settings.contains(&json!({"id": "min_tls_version", "value": "1.2"})));

        let rules = payload["page_rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0]["targets"][0]["constraint"]["value"],
            json!("example.com/assets/*")
        );
        assert_eq!(rules[1]["actions"][0]["value"], json!("bypass"));
        assert_eq!(payload["worker"]["route"], json!("example.com/*"));
        assert!(config.artifact(WORKER_FILE_NAME).is_some());
    }

    #[tokio::test]
    async fn test_validate_without_credentials_reports_errors() {
        let report = provider().validate().await.unwrap();
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("CLOUDFLARE_API_TOKEN")));
        assert!(report.errors.iter().any(|e| e.contains("CLOUDFLARE_ZONE_ID")));
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_health_check_requires_credentials() {
        let err = provider().health_check().await.unwrap_err();
        assert_eq!(err.error_type(), "authentication");
    }
}
