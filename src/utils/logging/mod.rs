//! Logging setup and log hygiene helpers
//!
//! Both binaries call [`init`] once at startup. `RUST_LOG` controls the
//! filter (default `info`) and `LOG_FORMAT=json` switches to JSON lines.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::EnvFilter;

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)(api[_-]?key|token|secret|password)(["']?\s*[:=]\s*["']?)([A-Za-z0-9\-_\.\/\+]{6,})"#,
        r"(?i)(bearer\s+)([A-Za-z0-9\-_\.]{6,})",
        r"(?i)(credential=)([A-Z0-9]{12,})",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Initialize the global tracing subscriber
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // try_init: tests and repeated calls must not panic
    if json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init();
    }
}

/// Mask credential-looking substrings before they reach a log line or report
pub fn redact(input: &str) -> String {
    let mut result = input.to_string();
    for re in SECRET_PATTERNS.iter() {
        result = re
            .replace_all(&result, |caps: &regex::Captures| {
                // keep every group except the last, which is the secret value
                let keep: String = (1..caps.len() - 1)
                    .filter_map(|i| caps.get(i).map(|m| m.as_str()))
                    .collect();
                format!("{}[REDACTED]", keep)
            })
            .to_string();
    }
    result
}

/// Mask a single credential value, keeping a short prefix for recognisability
pub fn mask_secret(value: &str) -> String {
    if value.len() > 8 {
        format!("{}***", &value[..4])
    } else {
        "***".to_string()
    }
}
