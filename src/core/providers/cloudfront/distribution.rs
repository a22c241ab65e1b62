//! Distribution payload rendering for the 2020-05-31 CloudFront API

use crate::core::providers::types::EdgePolicy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};

pub const API_VERSION: &str = "2020-05-31";
pub const DISTRIBUTION_FILE_NAME: &str = "cloudfront-distribution.xml";
pub const LAMBDA_FILE_NAME: &str = "lambda-edge-origin-response.js";

const ORIGIN_ID: &str = "primary-origin";

/// Distribution settings derived from the policy
pub fn distribution_payload(policy: &EdgePolicy, price_class: &str, certificate_arn: Option<&str>) -> Value {
    let viewer_protocol_policy = if policy.transport.always_use_https {
        "redirect-to-https"
    } else {
        "allow-all"
    };
    let http_version = match (policy.optimization.http2, policy.optimization.http3) {
        (_, true) => "http2and3",
        (true, false) => "http2",
        (false, false) => "http1.1",
    };

    let behaviors: Vec<Value> = policy
        .cache_rules
        .iter()
        .map(|rule| {
            let path = rule.pattern.trim_start_matches('/');
            json!({
                "path_pattern": format!("/{}", path),
                "min_ttl": 0,
                "default_ttl": if rule.bypass { 0 } else { rule.edge_ttl },
                "max_ttl": if rule.bypass { 0 } else { rule.edge_ttl.max(rule.browser_ttl) },
            })
        })
        .collect();

    json!({
        "caller_reference": format!("cdn-deploy-{}", chrono::Utc::now().timestamp_millis()),
        "comment": format!("Managed by cdn-deploy for {}", policy.domain),
        "aliases": [policy.domain],
        "origin": {"id": ORIGIN_ID, "domain_name": policy.origin_host()},
        "default_cache_behavior": {
            "target_origin_id": ORIGIN_ID,
            "viewer_protocol_policy": viewer_protocol_policy,
            "compress": policy.optimization.brotli,
            "default_ttl": 86400,
        },
        "cache_behaviors": behaviors,
        "http_version": http_version,
        "price_class": price_class,
        "certificate_arn": certificate_arn,
        "min_tls_version": min_protocol_version(&policy.transport.min_tls_version),
        "response_headers": policy.headers,
        "enabled": true,
    })
}

fn min_protocol_version(version: &str) -> &'static str {
    match version {
        "1.3" | "1.2" => "TLSv1.2_2021",
        "1.1" => "TLSv1.1_2016",
        _ => "TLSv1_2016",
    }
}

/// Render the `DistributionConfig` XML document for `payload`
pub fn render_distribution_xml(payload: &Value) -> String {
    let s = |pointer| str_at(payload, pointer);

    let aliases: Vec<&str> = payload["aliases"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let alias_items: String = aliases
        .iter()
        .map(|a| format!("<CNAME>{}</CNAME>", xml_escape(a)))
        .collect();

    let behaviors = payload["cache_behaviors"].as_array().cloned().unwrap_or_default();
    let behavior_items: String = behaviors
        .iter()
        .map(|b| {
            format!(
                "<CacheBehavior><PathPattern>{path}</PathPattern><TargetOriginId>{origin}</TargetOriginId>\
                 <ViewerProtocolPolicy>{vpp}</ViewerProtocolPolicy>{methods}<Compress>{compress}</Compress>\
                 {forwarded}<MinTTL>{min}</MinTTL><DefaultTTL>{default}</DefaultTTL><MaxTTL>{max}</MaxTTL></CacheBehavior>",
                path = xml_escape(b["path_pattern"].as_str().unwrap_or("/*")),
                origin = ORIGIN_ID,
                vpp = s("/default_cache_behavior/viewer_protocol_policy"),
                methods = ALLOWED_METHODS,
                compress = payload.pointer("/default_cache_behavior/compress").and_then(Value::as_bool).unwrap_or(true),
                forwarded = FORWARDED_VALUES,
                min = b["min_ttl"].as_u64().unwrap_or_default(),
                default = b["default_ttl"].as_u64().unwrap_or_default(),
                max = b["max_ttl"].as_u64().unwrap_or_default(),
            )
        })
        .collect();

    let viewer_certificate = match payload["certificate_arn"].as_str() {
        Some(arn) => format!(
            "<ViewerCertificate><ACMCertificateArn>{}</ACMCertificateArn><SSLSupportMethod>sni-only</SSLSupportMethod>\
             <MinimumProtocolVersion>{}</MinimumProtocolVersion></ViewerCertificate>",
            xml_escape(arn),
            s("/min_tls_version")
        ),
        None => "<ViewerCertificate><CloudFrontDefaultCertificate>true</CloudFrontDefaultCertificate></ViewerCertificate>"
            .to_string(),
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<DistributionConfig xmlns="http://cloudfront.amazonaws.com/doc/{version}/">
<CallerReference>{caller}</CallerReference>
<Aliases><Quantity>{alias_count}</Quantity><Items>{alias_items}</Items></Aliases>
<DefaultRootObject>index.html</DefaultRootObject>
<Origins><Quantity>1</Quantity><Items><Origin><Id>{origin_id}</Id><DomainName>{origin}</DomainName><OriginPath></OriginPath><CustomHeaders><Quantity>0</Quantity></CustomHeaders><CustomOriginConfig><HTTPPort>80</HTTPPort><HTTPSPort>443</HTTPSPort><OriginProtocolPolicy>https-only</OriginProtocolPolicy><OriginSslProtocols><Quantity>1</Quantity><Items><SslProtocol>TLSv1.2</SslProtocol></Items></OriginSslProtocols></CustomOriginConfig></Origin></Items></Origins>
<DefaultCacheBehavior><TargetOriginId>{origin_id}</TargetOriginId><ViewerProtocolPolicy>{vpp}</ViewerProtocolPolicy>{methods}<Compress>{compress}</Compress>{forwarded}<MinTTL>0</MinTTL><DefaultTTL>{default_ttl}</DefaultTTL><MaxTTL>31536000</MaxTTL></DefaultCacheBehavior>
<CacheBehaviors><Quantity>{behavior_count}</Quantity><Items>{behavior_items}</Items></CacheBehaviors>
<Comment>{comment}</Comment>
<PriceClass>{price_class}</PriceClass>
<Enabled>true</Enabled>
{viewer_certificate}
<HttpVersion>{http_version}</HttpVersion>
<IsIPV6Enabled>true</IsIPV6Enabled>
</DistributionConfig>"#,
        version = API_VERSION,
        caller = xml_escape(s("/caller_reference")),
        alias_count = aliases.len(),
        alias_items = alias_items,
        origin_id = ORIGIN_ID,
        origin = xml_escape(s("/origin/domain_name")),
        vpp = s("/default_cache_behavior/viewer_protocol_policy"),
        methods = ALLOWED_METHODS,
        compress = payload.pointer("/default_cache_behavior/compress").and_then(Value::as_bool).unwrap_or(true),
        forwarded = FORWARDED_VALUES,
        default_ttl = payload.pointer("/default_cache_behavior/default_ttl").and_then(Value::as_u64).unwrap_or(86400),
        behavior_count = behaviors.len(),
        behavior_items = behavior_items,
        comment = xml_escape(s("/comment")),
        price_class = xml_escape(s("/price_class")),
        viewer_certificate = viewer_certificate,
        http_version = s("/http_version"),
    )
}

const ALLOWED_METHODS: &str = "<AllowedMethods><Quantity>3</Quantity><Items><Method>GET</Method><Method>HEAD</Method><Method>OPTIONS</Method></Items><CachedMethods><Quantity>2</Quantity><Items><Method>GET</Method><Method>HEAD</Method></Items></CachedMethods></AllowedMethods>";

const FORWARDED_VALUES: &str = "<ForwardedValues><QueryString>false</QueryString><Cookies><Forward>none</Forward></Cookies></ForwardedValues>";

const LAMBDA_TEMPLATE: &str = r#"'use strict';
// Generated origin-response handler. Do not edit by hand.
const SECURITY_HEADERS = __HEADERS__;

exports.handler = async (event) => {
  const response = event.Records[0].cf.response;
  for (const [name, value] of Object.entries(SECURITY_HEADERS)) {
    response.headers[name.toLowerCase()] = [{ key: name, value }];
  }
  return response;
};
"#;

/// Render the Lambda@Edge origin-response function attaching the policy headers
pub fn render_lambda_edge(policy: &EdgePolicy) -> String {
    let headers = serde_json::to_string_pretty(&policy.headers).unwrap_or_else(|_| "{}".into());
    LAMBDA_TEMPLATE.replace("__HEADERS__", &headers)
}

static CALLER_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<CallerReference>([^<]*)</CallerReference>").unwrap());

/// Swap the caller reference, which must stay unchanged when updating a distribution
pub fn replace_caller_reference(xml: &str, caller_reference: &str) -> String {
    CALLER_REFERENCE
        .replace(xml, format!("<CallerReference>{}</CallerReference>", xml_escape(caller_reference)))
        .into_owned()
}

/// First text value of `<tag>` in an XML document
pub fn extract_tag(xml: &str, tag: &str) -> Option<String> {
    let pattern = format!(r"<{tag}>([^<]*)</{tag}>", tag = regex::escape(tag));
    Regex::new(&pattern)
        .ok()?
        .captures(xml)
        .map(|c| c[1].to_string())
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
