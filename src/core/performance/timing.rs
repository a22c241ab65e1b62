//! Sequential DNS, TCP, TLS and HTTP timing for one URL

use super::stats::cache_hit;
use super::types::EndpointTiming;
use crate::utils::net::TlsProbe;
use crate::utils::net::tls::elapsed_ms;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

/// Time each connection phase for `url`, one after the other.
///
/// A DNS failure ends the measurement; TCP or TLS failures are recorded and
/// the HTTP request is still attempted.
pub async fn measure_endpoint(client: &Client, url: &Url, limit: Duration) -> EndpointTiming {
    let mut timing = EndpointTiming::new(url.as_str());
    let Some(host) = url.host_str() else {
        timing.error = Some("URL has no host".to_string());
        return timing;
    };
    let port = url.port_or_known_default().unwrap_or(443);

    let dns_start = Instant::now();
    let addr = match timeout(limit, tokio::net::lookup_host((host, port))).await {
        Ok(Ok(mut addrs)) => addrs.next(),
        Ok(Err(e)) => {
            timing.error = Some(format!("DNS lookup failed: {}", e));
            return timing;
        }
        Err(_) => {
            timing.error = Some("DNS lookup timed out".to_string());
            return timing;
        }
    };
    timing.dns_ms = Some(elapsed_ms(dns_start));
    let Some(addr) = addr else {
        timing.error = Some(format!("No addresses found for {}", host));
        return timing;
    };

    if url.scheme() == "https" {
        match TlsProbe::handshake_with_addr(addr, host, limit).await {
            Ok(info) => {
                timing.tcp_ms = Some(info.tcp_connect_ms);
                timing.tls_ms = Some(info.handshake_ms);
            }
            Err(e) => timing.error = Some(e.to_string()),
        }
    } else {
        let tcp_start = Instant::now();
        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => timing.tcp_ms = Some(elapsed_ms(tcp_start)),
            Ok(Err(e)) => timing.error = Some(format!("TCP connect failed: {}", e)),
            Err(_) => timing.error = Some("TCP connect timed out".to_string()),
        }
    }

    let request_start = Instant::now();
    match client.get(url.clone()).send().await {
        Ok(response) => {
            timing.ttfb_ms = Some(elapsed_ms(request_start));
            timing.status = Some(response.status().as_u16());
            timing.cache_hit = cache_hit(response.headers());
            match response.bytes().await {
                Ok(body) => {
                    timing.total_ms = Some(elapsed_ms(request_start));
                    debug!("{} -> {} bytes", url, body.len());
                }
                Err(e) => timing.error = Some(format!("Reading body failed: {}", e)),
            }
        }
        Err(e) => timing.error = Some(format!("HTTP request failed: {}", e)),
    }

    timing
}
