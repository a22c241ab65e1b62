//! VCL snippet generation

use crate::core::providers::types::EdgePolicy;
use serde::{Deserialize, Serialize};

/// A regular VCL snippet attached to a service version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VclSnippet {
    pub name: String,
    /// Subroutine the snippet is inserted into (`recv`, `fetch`, `deliver`)
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: u32,
    pub dynamic: u8,
    pub content: String,
}

impl VclSnippet {
    fn new(name: &str, kind: &str, priority: u32, content: String) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            priority,
            dynamic: 0,
            content,
        }
    }
}

/// Snippets for HTTPS redirect, per-rule TTLs and security headers
pub fn generate_snippets(policy: &EdgePolicy) -> Vec<VclSnippet> {
    let mut recv = String::new();
    if policy.transport.always_use_https {
        recv.push_str("if (!req.http.Fastly-SSL) {\n  error 801 \"Force TLS\";\n}\n");
    }
    for rule in policy.cache_rules.iter().filter(|r| r.bypass) {
        recv.push_str(&format!(
            "if (req.url.path ~ \"{}\") {{\n  return(pass);\n}}\n",
            glob_to_regex(&rule.pattern)
        ));
    }

    let mut fetch = String::new();
    for rule in policy.cache_rules.iter().filter(|r| !r.bypass) {
        fetch.push_str(&format!(
            "if (req.url.path ~ \"{}\") {{\n  set beresp.ttl = {}s;\n  set beresp.http.Cache-Control = \"{}\";\n  return(deliver);\n}}\n",
            glob_to_regex(&rule.pattern),
            rule.edge_ttl,
            rule.cache_control()
        ));
    }

    let deliver: String = policy
        .headers
        .iter()
        .map(|(name, value)| {
            format!(
                "set resp.http.{} = \"{}\";\n",
                name,
                value.replace('\\', "\\\\").replace('"', "%22")
            )
        })
        .collect();

    vec![
        VclSnippet::new("cdn-deploy-recv", "recv", 100, recv),
        VclSnippet::new("cdn-deploy-fetch", "fetch", 100, fetch),
        VclSnippet::new("cdn-deploy-deliver", "deliver", 100, deliver),
    ]
}

/// Anchored regex for a single-wildcard path glob
pub fn glob_to_regex(pattern: &str) -> String {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    if pattern.starts_with('*') {
        format!("{}$", escaped)
    } else {
        format!("^{}$", escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::{CacheRule, OptimizationConfig, TransportSecurityConfig};
    use std::collections::BTreeMap;

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("/assets/*"), r"^/assets/.*$");
        assert_eq!(glob_to_regex("*.html"), r".*\.html$");
    }

    #[test]
    fn test_snippets() {
        let mut headers = BTreeMap::new();
        headers.insert("X-Frame-Options".to_string(), "DENY".to_string());
        let policy = EdgePolicy {
            domain: "example.com".to_string(),
            origin: None,
            fallback_origin: None,
            headers,
            cache_rules: vec![
                CacheRule::new("/assets/*", 600, 600),
                CacheRule {
                    bypass: true,
                    ..CacheRule::new("/api/*", 0, 0)
                },
            ],
            optimization: OptimizationConfig::default(),
            transport: TransportSecurityConfig::default(),
        };

        let snippets = generate_snippets(&policy);
        assert_eq!(snippets.len(), 3);
        assert!(snippets[0].content.contains("error 801"));
        assert!(snippets[0].content.contains(r#"req.url.path ~ "^/api/.*$""#));
        assert!(snippets[1].content.contains("set beresp.ttl = 600s;"));
        assert!(!snippets[1].content.contains("/api/"));
        assert_eq!(snippets[2].content, "set resp.http.X-Frame-Options = \"DENY\";\n");
    }
}
