//! Edge worker script generation
//!
//! The script is an opaque artifact: it is rendered from the policy and
//! uploaded, never executed here.

use crate::core::providers::types::EdgePolicy;
use serde_json::json;

pub const WORKER_FILE_NAME: &str = "cloudflare-worker.js";

const WORKER_TEMPLATE: &str = r#"// Generated edge worker. Do not edit by hand.
const SECURITY_HEADERS = __HEADERS__;
const CACHE_RULES = __CACHE_RULES__;
const FALLBACK_ORIGIN = __FALLBACK_ORIGIN__;

function matches(pattern, path) {
  const star = pattern.indexOf('*');
  if (star === -1) return pattern === path;
  const prefix = pattern.slice(0, star);
  const suffix = pattern.slice(star + 1);
  return path.length >= prefix.length + suffix.length &&
    path.startsWith(prefix) && path.endsWith(suffix);
}

async function fetchWithFallback(request) {
  try {
    const response = await fetch(request);
    if (response.status < 500 || !FALLBACK_ORIGIN) return response;
  } catch (err) {
    if (!FALLBACK_ORIGIN) throw err;
  }
  const url = new URL(request.url);
  const fallback = new URL(url.pathname + url.search, FALLBACK_ORIGIN);
  return fetch(new Request(fallback.toString(), request));
}

export default {
  async fetch(request) {
    const upstream = await fetchWithFallback(request);
    const response = new Response(upstream.body, upstream);
    for (const [name, value] of Object.entries(SECURITY_HEADERS)) {
      response.headers.set(name, value);
    }
    const path = new URL(request.url).pathname;
    const rule = CACHE_RULES.find((r) => matches(r.pattern, path));
    if (rule) response.headers.set('Cache-Control', rule.cacheControl);
    return response;
  },
};
"#;

/// Render the worker source for `policy`
pub fn render_worker_script(policy: &EdgePolicy) -> String {
    let rules: Vec<serde_json::Value> = policy
        .cache_rules
        .iter()
        .map(|rule| json!({"pattern": rule.pattern, "cacheControl": rule.cache_control()}))
        .collect();

    let headers = serde_json::to_string_pretty(&policy.headers).unwrap_or_else(|_| "{}".into());
    let rules = serde_json::to_string_pretty(&rules).unwrap_or_else(|_| "[]".into());
    let fallback = match &policy.fallback_origin {
        Some(origin) => serde_json::Value::String(origin.clone()).to_string(),
        None => "null".to_string(),
    };

    WORKER_TEMPLATE
        .replace("__HEADERS__", &headers)
        .replace("__CACHE_RULES__", &rules)
        .replace("__FALLBACK_ORIGIN__", &fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::{CacheRule, OptimizationConfig, TransportSecurityConfig};
    use std::collections::BTreeMap;

    fn policy(fallback: Option<&str>) -> EdgePolicy {
        let mut headers = BTreeMap::new();
        headers.insert("X-Frame-Options".to_string(), "DENY".to_string());
        EdgePolicy {
            domain: "example.com".to_string(),
            origin: None,
            fallback_origin: fallback.map(str::to_string),
            headers,
            cache_rules: vec![CacheRule::new("*.html", 300, 0)],
            optimization: OptimizationConfig::default(),
            transport: TransportSecurityConfig::default(),
        }
    }

    #[test]
    fn test_script_embeds_policy() {
        let script = render_worker_script(&policy(Some("https://backup.example.com")));
        assert!(script.contains(r#""X-Frame-Options": "DENY""#));
        assert!(script.contains(r#""pattern": "*.html""#));
        assert!(script.contains("public, max-age=0, must-revalidate"));
        assert!(script.contains(r#"const FALLBACK_ORIGIN = "https://backup.example.com";"#));
        assert!(!script.contains("__"));
    }

    #[test]
    fn test_script_without_fallback() {
        let script = render_worker_script(&policy(None));
        assert!(script.contains("const FALLBACK_ORIGIN = null;"));
    }
}
