//! `vercel.json` generation

use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::types::EdgePolicy;
use serde_json::{Value, json};

pub const MANIFEST_FILE_NAME: &str = "vercel.json";

/// Convert a path glob into a Vercel route source
pub fn route_source(pattern: &str) -> String {
    let source = pattern.replace('*', "(.*)");
    if source.starts_with('/') {
        source
    } else {
        format!("/{}", source)
    }
}

/// Build the `vercel.json` document
pub fn vercel_manifest(policy: &EdgePolicy) -> Value {
    let security: Vec<Value> = policy
        .headers
        .iter()
        .map(|(key, value)| json!({"key": key, "value": value}))
        .collect();

    let mut headers = vec![json!({"source": "/(.*)", "headers": security})];
    headers.extend(policy.cache_rules.iter().map(|rule| {
        json!({
            "source": route_source(&rule.pattern),
            "headers": [{"key": "Cache-Control", "value": rule.cache_control()}],
        })
    }));

    let mut manifest = json!({
        "cleanUrls": true,
        "trailingSlash": false,
        "headers": headers,
        "rewrites": [{"source": "/(.*)", "destination": "/index.html"}],
    });

    if policy.transport.always_use_https {
        manifest["redirects"] = json!([{
            "source": "/(.*)",
            "has": [{"type": "header", "key": "x-forwarded-proto", "value": "http"}],
            "destination": format!("https://{}/$1", policy.domain),
            "permanent": true,
        }]);
    }

    manifest
}

/// Render `vercel.json` as pretty JSON
pub fn render_vercel_json(policy: &EdgePolicy) -> ProviderResult<String> {
    serde_json::to_string_pretty(&vercel_manifest(policy))
        .map_err(|e| ProviderError::serialization("vercel", e.to_string()))
}
