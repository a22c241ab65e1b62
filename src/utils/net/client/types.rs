use std::collections::HashMap;
use std::time::Duration;

/// Timeout for vendor API calls
pub const VENDOR_API_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for health checks
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for security scanner probes
pub const SCAN_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for performance probes
pub const PERFORMANCE_PROBE_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for webhook delivery
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Follow redirects automatically. Scanners turn this off to inspect them.
    pub follow_redirects: bool,
    pub proxy: Option<String>,
    pub default_headers: HashMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: VENDOR_API_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("cdn-deploy/{}", env!("CARGO_PKG_VERSION")),
            follow_redirects: true,
            proxy: None,
            default_headers: HashMap::new(),
        }
    }
}

impl HttpClientConfig {
    /// Config with a specific overall timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Disable redirect following
    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}
