//! Configuration data models

pub mod deployment;
pub mod monitoring;
pub mod policy;
pub mod provider;
pub mod security;

pub use deployment::*;
pub use monitoring::*;
pub use policy::*;
pub use provider::*;
pub use security::*;

/// Default true
pub fn default_true() -> bool {
    true
}

/// Default provider name
pub fn default_provider() -> String {
    "cloudflare".to_string()
}

/// Default build command
pub fn default_build_command() -> String {
    "npm run build".to_string()
}

/// Default build output directory
pub fn default_build_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("dist")
}

/// Default working directory for generated artifacts
pub fn default_working_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(".")
}

/// Default report directory
pub fn default_report_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(".")
}

/// Default minimum security score percentage
pub fn default_security_threshold() -> f64 {
    80.0
}

/// Default redirect depth for loop detection
pub fn default_max_redirect_depth() -> u32 {
    10
}

/// Default concurrent requests used for rate limit detection
pub fn default_rate_limit_burst() -> usize {
    10
}

/// Default monitoring interval
pub fn default_monitoring_interval_ms() -> u64 {
    60_000
}

/// Default monitoring duration for the deploy pipeline
pub fn default_monitoring_duration_secs() -> u64 {
    300
}

/// Default response time alert threshold
pub fn default_response_time_threshold_ms() -> f64 {
    2000.0
}

/// Default availability alert threshold (percent)
pub fn default_availability_threshold() -> f64 {
    99.0
}

/// Default error rate alert threshold (percent)
pub fn default_error_rate_threshold() -> f64 {
    5.0
}

/// Default metrics directory
pub fn default_metrics_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("cdn-metrics")
}

/// Default metric file retention
pub fn default_retention_hours() -> u64 {
    24
}

/// Default HSTS max-age
pub fn default_hsts_max_age() -> u64 {
    31_536_000
}

/// Default minimum TLS version
pub fn default_min_tls_version() -> String {
    "1.2".to_string()
}
