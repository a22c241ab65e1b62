use super::types::HttpClientConfig;
use crate::utils::error::{CdnError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Proxy};
use std::env;

/// Utility functions for HTTP client operations
pub struct ClientUtils;

impl ClientUtils {
    /// Creates an HTTP client with the specified configuration
    pub fn create_http_client(config: &HttpClientConfig) -> Result<Client> {
        let mut client_builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        client_builder = if config.follow_redirects {
            client_builder.redirect(Policy::limited(10))
        } else {
            client_builder.redirect(Policy::none())
        };

        let proxy_url = config
            .proxy
            .clone()
            .or_else(|| env::var("HTTPS_PROXY").ok());
        if let Some(proxy_url) = proxy_url {
            let proxy = Proxy::all(&proxy_url)
                .map_err(|e| CdnError::config(format!("Invalid proxy configuration: {}", e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        if !config.default_headers.is_empty() {
            let mut headers = HeaderMap::new();
            for (key, value) in &config.default_headers {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                    CdnError::config(format!("Invalid header name '{}': {}", key, e))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    CdnError::config(format!("Invalid header value for '{}': {}", key, e))
                })?;
                headers.insert(name, value);
            }
            client_builder = client_builder.default_headers(headers);
        }

        client_builder
            .build()
            .map_err(|e| CdnError::config(format!("Failed to build HTTP client: {}", e)))
    }

    /// Appends a path to an API base URL
    pub fn add_path_to_api_base(api_base: &str, ending_path: &str) -> String {
        let base = api_base.trim_end_matches('/');
        let path = ending_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Read a response header as an owned lowercase-insensitive string
    pub fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    /// Whether a content-type header value denotes an HTML document
    pub fn is_html(content_type: Option<&str>) -> bool {
        content_type
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false)
    }

    /// Normalise a domain or URL into an `https://host` base URL
    pub fn normalize_base_url(domain: &str) -> Result<url::Url> {
        let candidate = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        };
        let url = url::Url::parse(&candidate)
            .map_err(|e| CdnError::config(format!("Invalid domain '{}': {}", domain, e)))?;
        if url.host_str().is_none() {
            return Err(CdnError::config(format!("Domain '{}' has no host", domain)));
        }
        Ok(url)
    }
}
