//! Network utilities: HTTP client construction and TLS probing

pub mod client;
pub mod tls;

pub use client::{ClientUtils, HttpClientConfig};
pub use tls::{CertificateSummary, TlsHandshakeInfo, TlsProbe};
