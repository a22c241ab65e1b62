//! Response header policy: security headers, CORS and CSP serialization

use crate::config::Config;
use std::collections::BTreeMap;

/// Serialize CSP directives as `name v1 v2; name2 ...`
///
/// Directives without sources (e.g. `upgrade-insecure-requests`) are
/// emitted as the bare name.
pub fn generate_csp_header(directives: &BTreeMap<String, Vec<String>>) -> String {
    directives
        .iter()
        .map(|(name, sources)| {
            if sources.is_empty() {
                name.clone()
            } else {
                format!("{} {}", name, sources.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Merge security, HSTS, CORS and CSP headers into one map
pub fn generate_headers(config: &Config) -> BTreeMap<String, String> {
    let policy = &config.policy;
    let mut headers = policy.security_headers.clone();

    if policy.transport.always_use_https {
        headers.insert(
            "Strict-Transport-Security".to_string(),
            format!(
                "max-age={}; includeSubDomains; preload",
                policy.transport.hsts_max_age
            ),
        );
    }

    if policy.cors.enabled {
        let origin = policy
            .cors
            .allow_origin
            .clone()
            .unwrap_or_else(|| config.site_url());
        headers.insert("Access-Control-Allow-Origin".to_string(), origin);
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            policy.cors.allow_methods.join(", "),
        );
        if !policy.cors.allow_headers.is_empty() {
            headers.insert(
                "Access-Control-Allow-Headers".to_string(),
                policy.cors.allow_headers.join(", "),
            );
        }
        headers.insert(
            "Access-Control-Max-Age".to_string(),
            policy.cors.max_age.to_string(),
        );
    }

    if !policy.csp.is_empty() {
        headers.insert(
            "Content-Security-Policy".to_string(),
            generate_csp_header(&policy.csp),
        );
    }

    headers
}
