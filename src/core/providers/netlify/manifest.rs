//! `netlify.toml` generation

use crate::core::providers::error::{ProviderError, ProviderResult};
use crate::core::providers::types::{EdgePolicy, SiteLayout};
use serde::Serialize;
use std::collections::BTreeMap;

pub const MANIFEST_FILE_NAME: &str = "netlify.toml";

#[derive(Debug, Serialize)]
struct NetlifyToml {
    build: BuildSection,
    headers: Vec<HeaderBlock>,
    redirects: Vec<Redirect>,
}

#[derive(Debug, Serialize)]
struct BuildSection {
    command: String,
    publish: String,
}

#[derive(Debug, Serialize)]
struct HeaderBlock {
    #[serde(rename = "for")]
    path: String,
    values: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct Redirect {
    from: String,
    to: String,
    status: u16,
    force: bool,
}

/// Render `netlify.toml` for the policy and project layout
pub fn render_netlify_toml(policy: &EdgePolicy, layout: &SiteLayout) -> ProviderResult<String> {
    let mut headers = vec![HeaderBlock {
        path: "/*".to_string(),
        values: policy.headers.clone(),
    }];
    headers.extend(policy.cache_rules.iter().map(|rule| HeaderBlock {
        path: if rule.pattern.starts_with('/') {
            rule.pattern.clone()
        } else {
            format!("/{}", rule.pattern)
        },
        values: BTreeMap::from([("Cache-Control".to_string(), rule.cache_control())]),
    }));

    let mut redirects = Vec::new();
    if policy.transport.always_use_https {
        redirects.push(Redirect {
            from: format!("http://{}/*", policy.domain),
            to: format!("https://{}/:splat", policy.domain),
            status: 301,
            force: true,
        });
    }
    redirects.push(Redirect {
        from: "/*".to_string(),
        to: "/index.html".to_string(),
        status: 200,
        force: false,
    });

    let document = NetlifyToml {
        build: BuildSection {
            command: layout.build_command.clone(),
            publish: layout.publish_dir.to_string_lossy().into_owned(),
        },
        headers,
        redirects,
    };

    toml::to_string_pretty(&document)
        .map_err(|e| ProviderError::serialization("netlify", e.to_string()))
}
