use super::{CACHE_MAX, COMPRESSION_MAX};
use crate::config::CacheProbe;
use crate::core::security::scanner::SecurityScanner;
use crate::core::security::types::{CheckResult, Severity};
use crate::utils::net::ClientUtils;
use serde_json::json;

/// Static assets should be cacheable for at least a day
const STATIC_MIN_MAX_AGE: u64 = 86_400;
/// HTML older than this without revalidation is considered stale-prone
const HTML_MAX_MAX_AGE: u64 = 3_600;

/// Verdict for one probed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheVerdict {
    Good,
    Weak,
    Bad,
}

/// Judge a `Cache-Control` value for a resource class
pub(crate) fn judge_cache_control(class: &str, cache_control: Option<&str>) -> CacheVerdict {
    let Some(cc) = cache_control.map(|c| c.to_ascii_lowercase()) else {
        return match class {
            "api" => CacheVerdict::Weak,
            _ => CacheVerdict::Bad,
        };
    };
    let max_age = directive_value(&cc, "max-age");
    let no_store = cc.contains("no-store");
    let revalidates = cc.contains("no-cache") || cc.contains("must-revalidate");

    match class {
        "static" => match max_age {
            _ if cc.contains("immutable") => CacheVerdict::Good,
            Some(age) if age >= STATIC_MIN_MAX_AGE => CacheVerdict::Good,
            Some(_) => CacheVerdict::Weak,
            None => CacheVerdict::Bad,
        },
        "api" => {
            if no_store || cc.contains("private") || cc.contains("no-cache") {
                CacheVerdict::Good
            } else if cc.contains("public") {
                CacheVerdict::Bad
            } else {
                CacheVerdict::Weak
            }
        }
        _ => match max_age {
            _ if no_store || revalidates => CacheVerdict::Good,
            Some(age) if age <= HTML_MAX_MAX_AGE => CacheVerdict::Good,
            Some(_) => CacheVerdict::Weak,
            None => CacheVerdict::Bad,
        },
    }
}

fn directive_value(cache_control: &str, name: &str) -> Option<u64> {
    cache_control.split(',').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().parse().ok()).flatten()
    })
}

impl SecurityScanner {
    /// Cache-Control heuristics per resource class
    pub async fn check_cache_headers(&self) -> CheckResult {
        let mut result = CheckResult::new("cache", CACHE_MAX);
        let probes = &self.config.cache_probes;
        if probes.is_empty() {
            result.award(CACHE_MAX);
            return result.finish(json!({"probes": []}));
        }
        let share = CACHE_MAX / probes.len() as f64;
        let mut details = Vec::with_capacity(probes.len());

        for CacheProbe { class, path } in probes {
            let url = match self.url_for(path) {
                Ok(url) => url,
                Err(e) => {
                    details.push(json!({"class": class, "path": path, "error": e.to_string()}));
                    continue;
                }
            };
            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    details.push(json!({"class": class, "path": path, "error": e.to_string()}));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                // nothing served, nothing to misconfigure
                result.award(share);
                details.push(json!({"class": class, "path": path, "status": status.as_u16(), "skipped": true}));
                continue;
            }

            let cache_control = ClientUtils::header_str(response.headers(), "cache-control");
            let verdict = judge_cache_control(class, cache_control.as_deref());
            match verdict {
                CacheVerdict::Good => result.award(share),
                CacheVerdict::Weak => {
                    result.award(share / 2.0);
                    result.recommend(format!("Tighten Cache-Control for {} resources ({})", class, path));
                }
                CacheVerdict::Bad => {
                    let severity = if class == "api" { Severity::Medium } else { Severity::Low };
                    result.vulnerability(
                        &format!("cache-{}", class),
                        format!("Unsuitable Cache-Control for {} ({}): {:?}", class, path, cache_control),
                        severity,
                    );
                    result.recommend(format!("Set an explicit Cache-Control policy for {} resources", class));
                }
            }
            details.push(json!({
                "class": class,
                "path": path,
                "status": status.as_u16(),
                "cache_control": cache_control,
                "verdict": format!("{:?}", verdict).to_lowercase(),
            }));
        }

        result.finish(json!({"probes": details}))
    }

    /// Content-Encoding negotiated for the home page
    pub async fn check_compression(&self) -> CheckResult {
        let response = match self
            .client
            .get(self.base_url.clone())
            .header("Accept-Encoding", "br, gzip, deflate")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return CheckResult::errored(
                    "compression",
                    COMPRESSION_MAX,
                    "compression-unreachable",
                    e,
                );
            }
        };

        let mut result = CheckResult::new("compression", COMPRESSION_MAX);
        let encoding = ClientUtils::header_str(response.headers(), "content-encoding")
            .map(|e| e.to_ascii_lowercase());
        match encoding.as_deref() {
            Some(e) if e.contains("br") => result.award(5.0),
            Some(e) if e.contains("gzip") => {
                result.award(4.0);
                result.recommend("Enable Brotli compression at the edge");
            }
            Some(e) if e.contains("deflate") => {
                result.award(3.0);
                result.recommend("Prefer Brotli or gzip over deflate");
            }
            _ => {
                result.vulnerability("no-compression", "Responses are not compressed", Severity::Low);
                result.recommend("Enable Brotli and gzip compression");
            }
        }

        result.finish(json!({"content_encoding": encoding}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_cache_verdicts() {
        assert_eq!(
            judge_cache_control("static", Some("public, max-age=31536000, immutable")),
            CacheVerdict::Good
        );
        assert_eq!(judge_cache_control("static", Some("max-age=600")), CacheVerdict::Weak);
        assert_eq!(judge_cache_control("static", Some("no-cache")), CacheVerdict::Bad);
        assert_eq!(judge_cache_control("static", None), CacheVerdict::Bad);
    }

    #[test]
    fn test_html_cache_verdicts() {
        assert_eq!(
            judge_cache_control("html", Some("public, max-age=0, must-revalidate")),
            CacheVerdict::Good
        );
        assert_eq!(judge_cache_control("html", Some("max-age=300")), CacheVerdict::Good);
        assert_eq!(judge_cache_control("html", Some("max-age=86400")), CacheVerdict::Weak);
    }

    #[test]
    fn test_api_cache_verdicts() {
        assert_eq!(judge_cache_control("api", Some("no-store")), CacheVerdict::Good);
        assert_eq!(judge_cache_control("api", Some("public, max-age=60")), CacheVerdict::Bad);
        assert_eq!(judge_cache_control("api", None), CacheVerdict::Weak);
    }
}
