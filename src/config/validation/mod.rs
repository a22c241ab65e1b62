//! Configuration validation
//!
//! - `trait_def`: the Validate trait
//! - `deployment_validators`: deployment target and pipeline settings
//! - `policy_validators`: headers, CSP, CORS and cache rules
//! - `monitoring_validators`: scanner and monitor thresholds

mod deployment_validators;
mod monitoring_validators;
mod policy_validators;
mod trait_def;

pub use trait_def::Validate;

/// Check that a URL string parses and uses http or https
pub(crate) fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let url = url::Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", field, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{} must use http or https, got '{}'", field, other)),
    }
}
