use super::{REDIRECT_MAX, SSL_MAX};
use crate::core::security::scanner::{SecurityScanner, is_redirect};
use crate::core::security::types::{CheckResult, Severity};
use crate::utils::net::client::SCAN_PROBE_TIMEOUT;
use crate::utils::net::{ClientUtils, TlsProbe};
use serde_json::json;

/// Certificates closer than this to expiry are flagged
const CERT_EXPIRY_WARNING_DAYS: i64 = 30;

impl SecurityScanner {
    /// Protocol version, cipher strength and certificate lifetime
    pub async fn check_ssl(&self) -> CheckResult {
        let mut result = CheckResult::new("ssl", SSL_MAX);
        let Some(host) = self.base_url.host_str() else {
            return CheckResult::errored("ssl", SSL_MAX, "ssl-no-host", "base URL has no host");
        };
        let port = self.base_url.port().unwrap_or(443);

        let info = match TlsProbe::handshake(host, port, SCAN_PROBE_TIMEOUT).await {
            Ok(info) => info,
            Err(e) => {
                result.vulnerability(
                    "ssl-handshake-failed",
                    format!("TLS handshake with {} failed: {}", host, e),
                    Severity::High,
                );
                result.recommend("Serve the site over HTTPS with a certificate from a trusted CA");
                return result.finish(json!({"error": e.to_string()}));
            }
        };
        result.award(8.0);

        if info.is_tls13() {
            result.award(4.0);
        } else if info.protocol.as_deref() == Some("TLSv1_2") {
            result.award(2.0);
            result.recommend("Enable TLS 1.3 at the edge");
        } else {
            result.vulnerability(
                "ssl-outdated-protocol",
                format!("Outdated TLS protocol negotiated: {:?}", info.protocol),
                Severity::High,
            );
        }

        if info.has_strong_cipher() {
            result.award(4.0);
        } else {
            result.vulnerability(
                "ssl-weak-cipher",
                format!("Non-AEAD cipher suite negotiated: {:?}", info.cipher_suite),
                Severity::Medium,
            );
            result.recommend("Restrict cipher suites to AES-GCM and ChaCha20-Poly1305");
        }

        match &info.certificate {
            Some(cert) if cert.days_until_expiry > CERT_EXPIRY_WARNING_DAYS => result.award(4.0),
            Some(cert) if cert.days_until_expiry < 0 => result.vulnerability(
                "ssl-certificate-expired",
                format!("Certificate expired on {}", cert.not_after),
                Severity::Critical,
            ),
            Some(cert) => {
                result.vulnerability(
                    "ssl-certificate-expiring",
                    format!("Certificate expires in {} days", cert.days_until_expiry),
                    Severity::Medium,
                );
                result.recommend("Renew the TLS certificate or enable automatic renewal");
            }
            None => result.recommend("Could not read the leaf certificate; verify it manually"),
        }

        result.finish(json!({
            "protocol": info.protocol,
            "cipher_suite": info.cipher_suite,
            "handshake_ms": info.handshake_ms,
            "certificate": info.certificate,
        }))
    }

    /// Plain HTTP must redirect permanently to HTTPS without looping
    pub async fn check_https_redirect(&self) -> CheckResult {
        let mut result = CheckResult::new("https-redirect", REDIRECT_MAX);

        let response = match self.direct.get(self.http_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                // nothing listening on plain HTTP is not a downgrade risk
                result.award(7.0);
                result.recommend("Listen on port 80 and redirect to HTTPS for users typing the bare domain");
                return result.finish(json!({"error": e.to_string()}));
            }
        };

        let status = response.status();
        let location = ClientUtils::header_str(response.headers(), "location");

        if !is_redirect(status) {
            result.vulnerability(
                "http-no-redirect",
                format!("HTTP request answered with {} instead of a redirect", status.as_u16()),
                Severity::High,
            );
            result.recommend("Redirect all HTTP traffic to HTTPS with a 301");
            return result.finish(json!({"status": status.as_u16()}));
        }

        let to_https = location
            .as_deref()
            .map(|l| l.starts_with("https://"))
            .unwrap_or(false);
        match (status.as_u16(), to_https) {
            (301 | 308, true) => result.award(7.0),
            (_, true) => {
                result.award(5.0);
                result.recommend("Use a permanent (301/308) redirect to HTTPS");
            }
            (_, false) => {
                result.award(2.0);
                result.vulnerability(
                    "http-redirect-not-https",
                    format!("HTTP redirect target is not HTTPS: {:?}", location),
                    Severity::Medium,
                );
            }
        }

        let max_depth = self.config.max_redirect_depth;
        let hops = match self.check_redirect_loop(self.http_url.clone(), 0, max_depth).await {
            Ok(hops) => {
                result.award(3.0);
                Some(hops)
            }
            Err(e) => {
                result.vulnerability("redirect-loop", e.to_string(), Severity::Medium);
                result.recommend("Fix conflicting redirect rules between origin and CDN");
                None
            }
        };

        result.finish(json!({
            "status": status.as_u16(),
            "location": location,
            "redirect_hops": hops,
        }))
    }
}
