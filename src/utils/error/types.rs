//! Error types for the deployment tooling

use crate::core::providers::error::ProviderError;
use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, CdnError>;

/// Main error type for orchestration code
#[derive(Error, Debug)]
pub enum CdnError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (invalid deployment configuration)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No adapter registered under the requested name
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Provider adapter errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML rendering errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Security scan errors
    #[error("Security scan error: {0}")]
    Scan(String),

    /// Monitoring errors
    #[error("Monitoring error: {0}")]
    Monitoring(String),

    /// Build stage errors
    #[error("Build error: {0}")]
    Build(String),

    /// Webhook notification errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Network errors outside of a provider call
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),
}

impl CdnError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a scan error
    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Short machine-readable category used in reports
    pub fn category(&self) -> &'static str {
        match self {
            CdnError::Config(_) | CdnError::Yaml(_) => "configuration",
            CdnError::Validation(_) => "validation",
            CdnError::ProviderNotFound(_) => "provider_not_found",
            CdnError::Provider(e) => e.error_type(),
            CdnError::HttpClient(_) | CdnError::Network(_) => "network",
            CdnError::Serialization(_) | CdnError::Toml(_) => "serialization",
            CdnError::Io(_) => "io",
            CdnError::Scan(_) => "scan",
            CdnError::Monitoring(_) => "monitoring",
            CdnError::Build(_) => "build",
            CdnError::Notification(_) => "notification",
            CdnError::Timeout(_) => "timeout",
        }
    }
}
