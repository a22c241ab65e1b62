//! CloudFront provider implementation

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

use super::config::CloudFrontConfig;
use super::distribution::*;
use super::sigv4::SigV4Signer;
use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::shared::{build_client, send};
use crate::core::providers::types::*;
use crate::core::providers::CdnProvider;
use crate::utils::net::client::HEALTH_CHECK_TIMEOUT;

const PROVIDER: &str = "cloudfront";

/// CloudFront adapter
#[derive(Debug, Clone)]
pub struct CloudFrontProvider {
    config: CloudFrontConfig,
    client: Client,
}

/// Distribution fields read back from the API
#[derive(Debug, Clone, PartialEq)]
struct DistributionSummary {
    id: Option<String>,
    status: Option<String>,
    domain_name: Option<String>,
    enabled: Option<String>,
}

impl DistributionSummary {
    fn parse(xml: &str) -> Self {
        Self {
            id: extract_tag(xml, "Id"),
            status: extract_tag(xml, "Status"),
            domain_name: extract_tag(xml, "DomainName"),
            enabled: extract_tag(xml, "Enabled"),
        }
    }
}

impl CloudFrontProvider {
    pub fn new(config: CloudFrontConfig) -> ProviderResult<Self> {
        let client = build_client(PROVIDER, config.timeout())?;
        Ok(Self { config, client })
    }

    fn signer(&self) -> ProviderResult<SigV4Signer> {
        match (&self.config.access_key_id, &self.config.secret_access_key) {
            (Some(access), Some(secret)) if !access.is_empty() && !secret.is_empty() => Ok(
                SigV4Signer::new(access.clone(), secret.clone(), self.config.session_token.clone()),
            ),
            _ => Err(ProviderError::authentication(
                PROVIDER,
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY are required",
            )),
        }
    }

    fn distribution_id(&self) -> ProviderResult<&str> {
        self.config
            .distribution_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::configuration(PROVIDER, "CLOUDFRONT_DISTRIBUTION_ID is not set"))
    }

    /// Build a request signed for this exact method, URL and body
    fn signed(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        extra: &[(&str, &str)],
    ) -> ProviderResult<RequestBuilder> {
        let url = format!("{}/{}{}", self.config.get_api_base(), API_VERSION, path);
        let mut headers: BTreeMap<String, String> = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if body.is_some() {
            headers.insert("content-type".to_string(), "application/xml".to_string());
        }

        let signed = self.signer()?.sign_request(
            method.as_str(),
            &url,
            &headers,
            body.as_deref().unwrap_or_default(),
            Utc::now(),
        )?;

        let mut request = self.client.request(method, &url);
        for (name, value) in signed.iter().filter(|(name, _)| name.as_str() != "host") {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request)
    }

    async fn get_distribution(&self, id: &str, timeout: Option<std::time::Duration>) -> ProviderResult<String> {
        let mut request = self.signed(Method::GET, &format!("/distribution/{}", id), None, &[])?;
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        send(PROVIDER, request)
            .await?
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))
    }

    async fn update_distribution(&self, id: &str, xml: &str) -> ProviderResult<String> {
        let current = send(
            PROVIDER,
            self.signed(Method::GET, &format!("/distribution/{}/config", id), None, &[])?,
        )
        .await?;
        let etag = current
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::api_error(PROVIDER, 200, "Distribution config response has no ETag"))?;
        let current_xml = current
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        let body = match extract_tag(&current_xml, "CallerReference") {
            Some(reference) => replace_caller_reference(xml, &reference),
            None => xml.to_string(),
        };

        debug!(distribution_id = id, etag = %etag, "Updating CloudFront distribution");
        send(
            PROVIDER,
            self.signed(
                Method::PUT,
                &format!("/distribution/{}/config", id),
                Some(body),
                &[("if-match", etag.as_str())],
            )?,
        )
        .await?
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))
    }

    async fn create_distribution(&self, xml: &str) -> ProviderResult<String> {
        info!("Creating CloudFront distribution");
        send(
            PROVIDER,
            self.signed(Method::POST, "/distribution", Some(xml.to_string()), &[])?,
        )
        .await?
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))
    }
}

#[async_trait]
impl CdnProvider for CloudFrontProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn generate_config(&self, policy: &EdgePolicy) -> ProviderResult<ProviderConfig> {
        let payload = distribution_payload(
            policy,
            &self.config.price_class,
            self.config.certificate_arn.as_deref(),
        );
        let xml = render_distribution_xml(&payload);

        Ok(ProviderConfig::new(PROVIDER, payload)
            .with_artifact(DISTRIBUTION_FILE_NAME, xml)
            .with_artifact(LAMBDA_FILE_NAME, render_lambda_edge(policy)))
    }

    async fn validate(&self) -> ProviderResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let has_access = report.require("AWS_ACCESS_KEY_ID", self.config.access_key_id.as_deref());
        let has_secret =
            report.require("AWS_SECRET_ACCESS_KEY", self.config.secret_access_key.as_deref());
        if self.config.distribution_id.is_none() {
            report.warning("CLOUDFRONT_DISTRIBUTION_ID is not set; a new distribution will be created");
        }
        if self.config.certificate_arn.is_none() {
            report.warning("No ACM certificate configured; aliases require a matching certificate");
        }

        if has_access && has_secret {
            let request = self.signed(Method::GET, "/distribution?MaxItems=1", None, &[])?;
            if let Err(e) = send(PROVIDER, request).await {
                report.error(format!("CloudFront API check failed: {}", e));
            }
        }

        Ok(report)
    }

    async fn deploy(&self, config: &ProviderConfig) -> ProviderResult<DeploymentOutcome> {
        let xml = match config.artifact(DISTRIBUTION_FILE_NAME) {
            Some(artifact) => artifact.contents.clone(),
            None => render_distribution_xml(&config.payload),
        };

        let (response, action) = match self.config.distribution_id.as_deref() {
            Some(id) if !id.is_empty() => (self.update_distribution(id, &xml).await?, "updated"),
            _ => (self.create_distribution(&xml).await?, "created"),
        };

        let summary = DistributionSummary::parse(&response);
        info!(
            distribution_id = summary.id.as_deref().unwrap_or("unknown"),
            action, "CloudFront distribution submitted"
        );

        Ok(DeploymentOutcome {
            provider: PROVIDER.to_string(),
            deployment_id: summary.id.clone(),
            url: summary.domain_name.as_ref().map(|d| format!("https://{}", d)),
            metadata: json!({
                "action": action,
                "status": summary.status,
                "lambda_edge_source": config.artifact(LAMBDA_FILE_NAME).map(|a| a.file_name.clone()),
            }),
        })
    }

    async fn health_check(&self) -> ProviderResult<HealthCheckResult> {
        let id = self.distribution_id()?;
        let started = Instant::now();
        let xml = self.get_distribution(id, Some(HEALTH_CHECK_TIMEOUT)).await?;
        let elapsed = started.elapsed();

        let summary = DistributionSummary::parse(&xml);
        let status = match summary.status.as_deref() {
            Some("Deployed") => HealthStatus::Healthy,
            _ => HealthStatus::Degraded,
        };

        Ok(HealthCheckResult {
            provider: PROVIDER.to_string(),
            status,
            response_time_ms: elapsed.as_secs_f64() * 1000.0,
            details: Some(json!({"distribution_status": summary.status})),
        })
    }

    async fn monitor(&self) -> ProviderResult<ProviderSnapshot> {
        let id = self.distribution_id()?;
        let summary = DistributionSummary::parse(&self.get_distribution(id, None).await?);

        Ok(ProviderSnapshot {
            provider: PROVIDER.to_string(),
            status: summary.status.clone().unwrap_or_else(|| "unknown".to_string()),
            data: json!({
                "id": summary.id,
                "domain_name": summary.domain_name,
                "enabled": summary.enabled.as_deref() == Some("true"),
            }),
        })
    }
}
