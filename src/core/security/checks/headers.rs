use super::{CORS_MAX, CSP_MAX, HEADERS_MAX};
use crate::core::security::csp::{effective_script_sources, parse_csp};
use crate::core::security::scanner::SecurityScanner;
use crate::core::security::types::{CheckResult, Severity};
use crate::utils::net::ClientUtils;
use reqwest::Method;
use serde_json::json;

/// Origin sent by the CORS probe
pub(crate) const PROBE_ORIGIN: &str = "https://evil.example.com";

/// HSTS max-age below half a year earns partial credit
const HSTS_MIN_MAX_AGE: u64 = 15_552_000;

const REQUIRED_HEADERS: [(&str, Severity); 5] = [
    ("strict-transport-security", Severity::Medium),
    ("x-content-type-options", Severity::Low),
    ("x-frame-options", Severity::Medium),
    ("referrer-policy", Severity::Low),
    ("permissions-policy", Severity::Low),
];

impl SecurityScanner {
    /// Presence and sanity of the baseline response headers
    pub async fn check_security_headers(&self) -> CheckResult {
        let response = match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return CheckResult::errored("headers", HEADERS_MAX, "headers-unreachable", e),
        };
        let mut result = CheckResult::new("headers", HEADERS_MAX);
        let per_header = HEADERS_MAX / REQUIRED_HEADERS.len() as f64;
        let headers = response.headers();
        let mut present = serde_json::Map::new();

        for (name, severity) in REQUIRED_HEADERS {
            let Some(value) = ClientUtils::header_str(headers, name) else {
                result.vulnerability(
                    &format!("missing-{}", name),
                    format!("Missing {} header", name),
                    severity,
                );
                result.recommend(format!("Add the {} header", name));
                continue;
            };

            match name {
                "strict-transport-security" => match hsts_max_age(&value) {
                    Some(age) if age >= HSTS_MIN_MAX_AGE => result.award(per_header),
                    _ => {
                        result.award(per_header / 2.0);
                        result.recommend("Raise HSTS max-age to at least 15552000 seconds");
                    }
                },
                "x-content-type-options" if !value.eq_ignore_ascii_case("nosniff") => {
                    result.vulnerability(
                        "invalid-x-content-type-options",
                        format!("x-content-type-options is '{}', expected nosniff", value),
                        Severity::Low,
                    );
                }
                _ => result.award(per_header),
            }
            present.insert(name.to_string(), json!(value));
        }

        result.finish(json!({"headers": present}))
    }

    /// Content-Security-Policy directive analysis
    pub async fn check_csp(&self) -> CheckResult {
        let response = match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return CheckResult::errored("csp", CSP_MAX, "csp-unreachable", e),
        };
        let mut result = CheckResult::new("csp", CSP_MAX);

        let Some(header) = ClientUtils::header_str(response.headers(), "content-security-policy")
        else {
            result.vulnerability(
                "missing-csp",
                "No Content-Security-Policy header",
                Severity::Medium,
            );
            result.recommend("Define a Content-Security-Policy starting from default-src 'self'");
            return result.finish(json!({"present": false}));
        };
        result.award(4.0);

        let directives = parse_csp(&header);
        if directives.contains_key("default-src") {
            result.award(2.0);
        } else {
            result.recommend("Add a default-src directive to the CSP");
        }

        let script_sources = effective_script_sources(&directives);
        let allows = |token: &str| {
            script_sources
                .map(|sources| sources.iter().any(|s| s == token))
                .unwrap_or(false)
        };
        if allows("'unsafe-inline'") {
            result.vulnerability(
                "csp-unsafe-inline",
                "CSP allows 'unsafe-inline' scripts",
                Severity::Medium,
            );
            result.recommend("Replace 'unsafe-inline' with nonces or hashes");
        } else {
            result.award(2.0);
        }
        if allows("'unsafe-eval'") {
            result.vulnerability("csp-unsafe-eval", "CSP allows 'unsafe-eval'", Severity::Medium);
        } else {
            result.award(1.0);
        }

        if directives.contains_key("frame-ancestors") || directives.contains_key("object-src") {
            result.award(1.0);
        } else {
            result.recommend("Restrict frame-ancestors and object-src in the CSP");
        }

        result.finish(json!({"present": true, "directives": directives}))
    }

    /// CORS preflight with a foreign origin, falling back to a plain GET
    pub async fn check_cors(&self) -> CheckResult {
        let preflight = self
            .client
            .request(Method::OPTIONS, self.base_url.clone())
            .header("Origin", PROBE_ORIGIN)
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await;

        let (method, response) = match preflight {
            Ok(response) if !matches!(response.status().as_u16(), 405 | 501) => ("OPTIONS", response),
            _ => {
                let fallback = self
                    .client
                    .get(self.base_url.clone())
                    .header("Origin", PROBE_ORIGIN)
                    .send()
                    .await;
                match fallback {
                    Ok(response) => ("GET", response),
                    Err(e) => return CheckResult::errored("cors", CORS_MAX, "cors-unreachable", e),
                }
            }
        };

        let mut result = CheckResult::new("cors", CORS_MAX);
        let headers = response.headers();
        let allow_origin = ClientUtils::header_str(headers, "access-control-allow-origin");
        let allow_credentials = ClientUtils::header_str(headers, "access-control-allow-credentials")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        match allow_origin.as_deref() {
            None => result.award(CORS_MAX),
            Some("*") => {
                result.award(5.0);
                result.vulnerability(
                    "cors-wildcard",
                    "Access-Control-Allow-Origin is '*'",
                    if allow_credentials { Severity::High } else { Severity::Low },
                );
                result.recommend("Restrict Access-Control-Allow-Origin to known origins");
            }
            Some(origin) if origin == PROBE_ORIGIN => {
                result.vulnerability(
                    "cors-origin-reflection",
                    "Arbitrary Origin is reflected in Access-Control-Allow-Origin",
                    if allow_credentials { Severity::Critical } else { Severity::High },
                );
                result.recommend("Validate Origin against an allow-list instead of echoing it");
            }
            Some(_) => result.award(CORS_MAX),
        }

        result.finish(json!({
            "method": method,
            "status": response.status().as_u16(),
            "allow_origin": allow_origin,
            "allow_credentials": allow_credentials,
        }))
    }
}

/// `max-age` value of a Strict-Transport-Security header
pub(crate) fn hsts_max_age(value: &str) -> Option<u64> {
    value.split(';').find_map(|part| {
        let (key, val) = part.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("max-age")
            .then(|| val.trim().trim_matches('"').parse().ok())
            .flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsts_max_age() {
        assert_eq!(
            hsts_max_age("max-age=31536000; includeSubDomains; preload"),
            Some(31_536_000)
        );
        assert_eq!(hsts_max_age("includeSubDomains; Max-Age=\"600\""), Some(600));
        assert_eq!(hsts_max_age("preload"), None);
    }
}
