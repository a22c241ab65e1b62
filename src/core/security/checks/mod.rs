//! Individual scanner checks
//!
//! Each check is an `impl SecurityScanner` method returning a finished
//! [`CheckResult`](super::types::CheckResult). Checks never fail; probe
//! errors are recorded as findings.

mod caching;
mod exposure;
mod headers;
mod transport;

pub use exposure::detect_cdn;

pub(crate) const SSL_MAX: f64 = 20.0;
pub(crate) const HEADERS_MAX: f64 = 15.0;
pub(crate) const CSP_MAX: f64 = 10.0;
pub(crate) const CACHE_MAX: f64 = 10.0;
pub(crate) const CORS_MAX: f64 = 10.0;
pub(crate) const REDIRECT_MAX: f64 = 10.0;
pub(crate) const DISCLOSURE_MAX: f64 = 10.0;
pub(crate) const DDOS_MAX: f64 = 5.0;
pub(crate) const RATE_LIMIT_MAX: f64 = 5.0;
pub(crate) const COMPRESSION_MAX: f64 = 5.0;
