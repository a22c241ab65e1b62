//! Raw TLS handshake probing
//!
//! Used by the security scanner (protocol, cipher, certificate expiry) and by
//! the performance monitor (handshake timing). Connects with the platform
//! root store, so an untrusted certificate surfaces as a handshake error.

use crate::utils::error::{CdnError, Result};
use once_cell::sync::OnceCell;
use rustls::ClientConfig;
use rustls::pki_types::ServerName;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::debug;

static TLS_CONFIG: OnceCell<Arc<ClientConfig>> = OnceCell::new();

/// Result of one TLS handshake against a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsHandshakeInfo {
    /// Negotiated protocol, e.g. `TLSv1_3`
    pub protocol: Option<String>,
    /// Negotiated cipher suite, e.g. `TLS13_AES_128_GCM_SHA256`
    pub cipher_suite: Option<String>,
    pub tcp_connect_ms: f64,
    pub handshake_ms: f64,
    pub certificate: Option<CertificateSummary>,
}

/// Leaf certificate details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub not_after: chrono::DateTime<chrono::Utc>,
    pub days_until_expiry: i64,
}

impl TlsHandshakeInfo {
    /// Whether TLS 1.3 was negotiated
    pub fn is_tls13(&self) -> bool {
        self.protocol.as_deref() == Some("TLSv1_3")
    }

    /// Whether the negotiated suite is an AEAD suite (GCM or ChaCha20)
    pub fn has_strong_cipher(&self) -> bool {
        self.cipher_suite
            .as_deref()
            .map(|c| c.contains("GCM") || c.contains("CHACHA20"))
            .unwrap_or(false)
    }
}

fn client_config() -> Result<Arc<ClientConfig>> {
    TLS_CONFIG
        .get_or_try_init(|| {
            let mut roots = rustls::RootCertStore::empty();
            let certs = rustls_native_certs::load_native_certs()
                .map_err(|e| CdnError::config(format!("Failed to load native roots: {}", e)))?;
            let (added, ignored) = roots.add_parsable_certificates(certs);
            debug!("Loaded {} native root certificates ({} ignored)", added, ignored);

            let provider = Arc::new(rustls::crypto::ring::default_provider());
            let config = ClientConfig::builder_with_provider(provider)
                .with_safe_default_protocol_versions()
                .map_err(|e| CdnError::config(format!("Invalid TLS configuration: {}", e)))?
                .with_root_certificates(roots)
                .with_no_client_auth();
            Ok(Arc::new(config))
        })
        .cloned()
}

/// TLS handshake prober
pub struct TlsProbe;

impl TlsProbe {
    /// Resolve `host` and perform a handshake on the first address
    pub async fn handshake(host: &str, port: u16, limit: Duration) -> Result<TlsHandshakeInfo> {
        let addr = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| CdnError::network(format!("DNS lookup for {} failed: {}", host, e)))?
            .next()
            .ok_or_else(|| CdnError::network(format!("No addresses found for {}", host)))?;
        Self::handshake_with_addr(addr, host, limit).await
    }

    /// Handshake against an already resolved address
    pub async fn handshake_with_addr(
        addr: SocketAddr,
        host: &str,
        limit: Duration,
    ) -> Result<TlsHandshakeInfo> {
        let config = client_config()?;
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| CdnError::config(format!("Invalid TLS server name {}: {}", host, e)))?;

        let tcp_start = Instant::now();
        let tcp = timeout(limit, TcpStream::connect(addr))
            .await
            .map_err(|_| CdnError::Timeout(format!("TCP connect to {} timed out", addr)))?
            .map_err(|e| CdnError::network(format!("TCP connect to {} failed: {}", addr, e)))?;
        let tcp_connect_ms = elapsed_ms(tcp_start);

        let tls_start = Instant::now();
        let stream = timeout(limit, TlsConnector::from(config).connect(server_name, tcp))
            .await
            .map_err(|_| CdnError::Timeout(format!("TLS handshake with {} timed out", host)))?
            .map_err(|e| CdnError::network(format!("TLS handshake with {} failed: {}", host, e)))?;
        let handshake_ms = elapsed_ms(tls_start);

        let (_, conn) = stream.get_ref();
        let certificate = conn
            .peer_certificates()
            .and_then(|chain| chain.first())
            .and_then(|leaf| summarize_certificate(leaf.as_ref()));

        Ok(TlsHandshakeInfo {
            protocol: conn.protocol_version().map(|v| format!("{:?}", v)),
            cipher_suite: conn.negotiated_cipher_suite().map(|s| format!("{:?}", s.suite())),
            tcp_connect_ms,
            handshake_ms,
            certificate,
        })
    }
}

fn summarize_certificate(der: &[u8]) -> Option<CertificateSummary> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
    let not_after =
        chrono::DateTime::<chrono::Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0)?;
    Some(CertificateSummary {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_after,
        days_until_expiry: (not_after - chrono::Utc::now()).num_days(),
    })
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(protocol: &str, cipher: &str) -> TlsHandshakeInfo {
        TlsHandshakeInfo {
            protocol: Some(protocol.to_string()),
            cipher_suite: Some(cipher.to_string()),
            tcp_connect_ms: 1.0,
            handshake_ms: 2.0,
            certificate: None,
        }
    }

    #[test]
    fn test_protocol_and_cipher_classification() {
        let modern = info("TLSv1_3", "TLS13_AES_128_GCM_SHA256");
        assert!(modern.is_tls13());
        assert!(modern.has_strong_cipher());

        let legacy = info("TLSv1_2", "TLS_RSA_WITH_AES_128_CBC_SHA");
        assert!(!legacy.is_tls13());
        assert!(!legacy.has_strong_cipher());
    }

    #[test]
    fn test_garbage_certificate_is_ignored() {
        assert!(summarize_certificate(b"not a certificate").is_none());
    }

    #[tokio::test]
    async fn test_handshake_refused_connection() {
        // port 9 on localhost is expected to be closed
        let addr: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let result = TlsProbe::handshake_with_addr(addr, "localhost", Duration::from_secs(2)).await;
        assert!(result.is_err());
    }
}
