//! Provider error handling
//!
//! A single error type shared by every CDN adapter. Every adapter operation
//! returns [`ProviderResult`], so callers never need to know whether a given
//! method reports failure through its payload or through an error.
//!
//! | Variant | Purpose |
//! |---------|---------|
//! | Authentication | Missing or rejected credentials |
//! | Configuration | Invalid adapter or policy settings |
//! | Network | Connection failures |
//! | Timeout | Request exceeded its deadline |
//! | ApiError | Non-2xx vendor response |
//! | Serialization | Payload could not be encoded or decoded |
//! | Artifact | Generated file could not be written |
//! | NotSupported | Operation unavailable for this vendor |

/// Result type for adapter operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Unified provider error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} API error ({status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Serialization error for {provider}: {message}")]
    Serialization {
        provider: &'static str,
        message: String,
    },

    #[error("Failed to write {provider} artifact: {message}")]
    Artifact {
        provider: &'static str,
        message: String,
    },

    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        provider: &'static str,
        operation: String,
    },
}

impl ProviderError {
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn serialization(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization {
            provider,
            message: message.into(),
        }
    }

    pub fn artifact(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Artifact {
            provider,
            message: message.into(),
        }
    }

    pub fn not_supported(provider: &'static str, operation: impl Into<String>) -> Self {
        Self::NotSupported {
            provider,
            operation: operation.into(),
        }
    }

    /// Map a transport failure from reqwest
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(provider, err.to_string())
        } else if err.is_decode() {
            Self::serialization(provider, err.to_string())
        } else {
            Self::network(provider, err.to_string())
        }
    }

    /// Map a non-2xx vendor response, extracting the message from a JSON body when present
    pub fn from_status(provider: &'static str, status: u16, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                crate::utils::truncate_string(body.trim(), 300)
            }
        });

        match status {
            401 | 403 => Self::authentication(provider, message),
            408 | 504 => Self::timeout(provider, message),
            _ => Self::api_error(provider, status, message),
        }
    }

    /// Get the provider name
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::Serialization { provider, .. }
            | Self::Artifact { provider, .. }
            | Self::NotSupported { provider, .. } => provider,
        }
    }

    /// Short machine-readable error type
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Configuration { .. } => "configuration",
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::ApiError { .. } => "api_error",
            Self::Serialization { .. } => "serialization",
            Self::Artifact { .. } => "artifact",
            Self::NotSupported { .. } => "not_supported",
        }
    }

    /// HTTP status returned by the vendor, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    // Cloudflare: {"errors":[{"code":..,"message":..}]}
    if let Some(errors) = value.get("errors").and_then(|e| e.as_array()) {
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
            .collect();
        if !messages.is_empty() {
            return Some(messages.join("; "));
        }
    }

    // Vercel nests {"error":{"message":..}}
    if let Some(message) = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    ["message", "error", "msg", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_parses_cloudflare_errors() {
        let body = r#"{"success":false,"errors":[{"code":10000,"message":"Authentication error"}]}"#;
        let err = ProviderError::from_status("cloudflare", 403, body);
        assert_eq!(err.error_type(), "authentication");
        assert!(err.to_string().contains("Authentication error"));
    }

    #[test]
    fn test_from_status_parses_flat_messages() {
        let err = ProviderError::from_status("fastly", 404, r#"{"msg":"Record not found"}"#);
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Record not found"));

        let err = ProviderError::from_status(
            "vercel",
            400,
            r#"{"error":{"code":"bad_request","message":"Invalid project"}}"#,
        );
        assert!(err.to_string().contains("Invalid project"));
    }

    #[test]
    fn test_from_status_plain_body() {
        let err = ProviderError::from_status("cloudfront", 500, "<Error>boom</Error>");
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("<Error>boom</Error>"));

        let err = ProviderError::from_status("netlify", 502, "");
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_provider_accessor() {
        let err = ProviderError::not_supported("netlify", "stats");
        assert_eq!(err.provider(), "netlify");
        assert_eq!(err.error_type(), "not_supported");
    }
}
