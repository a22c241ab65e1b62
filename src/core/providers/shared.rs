//! HTTP plumbing shared by the vendor adapters

use super::error::{ProviderError, ProviderResult};
use super::types::{GeneratedArtifact, HealthCheckResult, HealthStatus};
use crate::utils::net::{ClientUtils, HttpClientConfig};
use reqwest::{Client, RequestBuilder, Response};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Build the HTTP client an adapter uses for vendor API calls
pub fn build_client(provider: &'static str, timeout: Duration) -> ProviderResult<Client> {
    ClientUtils::create_http_client(&HttpClientConfig::with_timeout(timeout))
        .map_err(|e| ProviderError::configuration(provider, e.to_string()))
}

/// Send a request and turn non-2xx responses into errors
pub async fn send(provider: &'static str, request: RequestBuilder) -> ProviderResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(provider, status = status.as_u16(), "Vendor API returned an error");
    Err(ProviderError::from_status(provider, status.as_u16(), &body))
}

/// Send a request and decode the JSON body; an empty body decodes to `null`
pub async fn send_json(
    provider: &'static str,
    request: RequestBuilder,
) -> ProviderResult<serde_json::Value> {
    let response = send(provider, request).await?;
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&body)
        .map_err(|e| ProviderError::serialization(provider, format!("Invalid JSON response: {}", e)))
}

/// Time a lightweight request and classify the result
///
/// Responses slower than `degraded_after` are reported as degraded.
pub async fn timed_health_check(
    provider: &'static str,
    request: RequestBuilder,
    degraded_after: Duration,
) -> ProviderResult<HealthCheckResult> {
    let started = Instant::now();
    let body = send_json(provider, request).await?;
    let elapsed = started.elapsed();

    let status = if elapsed > degraded_after {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    Ok(HealthCheckResult {
        provider: provider.to_string(),
        status,
        response_time_ms: elapsed.as_secs_f64() * 1000.0,
        details: (!body.is_null()).then_some(body),
    })
}

/// Resolve an API base: explicit setting, then `<VENDOR>_API_BASE`, then the default
pub fn resolve_api_base(explicit: Option<&str>, env_key: &str, default: &str) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env_key).ok())
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Read a non-empty environment variable
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Require a credential, producing an authentication error when absent
pub fn require_credential<'a>(
    provider: &'static str,
    name: &str,
    value: Option<&'a str>,
) -> ProviderResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ProviderError::authentication(provider, format!("{} is not set", name)))
}

/// Write a generated artifact into `dir`, backing up any existing file
pub async fn write_artifact(
    provider: &'static str,
    dir: &Path,
    artifact: &GeneratedArtifact,
) -> ProviderResult<Option<PathBuf>> {
    crate::utils::fs::write_with_backup(dir, &artifact.file_name, &artifact.contents)
        .await
        .map_err(|e| ProviderError::artifact(provider, format!("{}: {}", artifact.file_name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_json_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"invalid token"}"#),
            )
            .mount(&server)
            .await;

        let client = build_client("fastly", Duration::from_secs(5)).unwrap();
        let err = send_json("fastly", client.get(format!("{}/thing", server.uri())))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "authentication");
        assert!(err.to_string().contains("invalid token"));
    }

    #[tokio::test]
    async fn test_send_json_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = build_client("netlify", Duration::from_secs(5)).unwrap();
        let value = send_json("netlify", client.post(server.uri())).await.unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn test_timed_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = build_client("vercel", Duration::from_secs(5)).unwrap();
        let result = timed_health_check("vercel", client.get(server.uri()), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.status, HealthStatus::Healthy);
        assert!(result.response_time_ms >= 0.0);
        assert_eq!(result.details, Some(serde_json::json!({"ok": true})));
    }

    #[test]
    fn test_resolve_api_base() {
        assert_eq!(
            resolve_api_base(Some("http://localhost:9000/"), "UNSET_TEST_API_BASE", "https://x"),
            "http://localhost:9000"
        );
        assert_eq!(
            resolve_api_base(None, "UNSET_TEST_API_BASE", "https://api.example.com"),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_require_credential() {
        assert_eq!(require_credential("x", "TOKEN", Some("t")).unwrap(), "t");
        assert!(require_credential("x", "TOKEN", Some("")).is_err());
        assert!(require_credential("x", "TOKEN", None).is_err());
    }
}
