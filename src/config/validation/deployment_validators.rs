//! Deployment configuration validators

use super::trait_def::Validate;
use super::validate_http_url;
use crate::config::models::*;
use tracing::debug;

impl Validate for DeploymentConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating deployment configuration");

        if self.provider.trim().is_empty() {
            return Err("CDN provider must be set".to_string());
        }

        if self.domain.trim().is_empty() {
            return Err("DOMAIN is required".to_string());
        }

        if self.domain.contains(char::is_whitespace) {
            return Err(format!("Domain '{}' contains whitespace", self.domain));
        }

        if let Some(origin) = &self.origin {
            validate_http_url("ORIGIN_URL", origin)?;
        }

        if let Some(url) = &self.webhook_url {
            validate_http_url("WEBHOOK_URL", url)?;
        }

        if self.build_command.trim().is_empty() {
            return Err("Build command cannot be empty".to_string());
        }

        self.fallback.validate()
    }
}

impl Validate for FallbackPolicy {
    fn validate(&self) -> Result<(), String> {
        if let Some(provider) = &self.provider {
            if provider.trim().is_empty() {
                return Err("Fallback provider cannot be an empty string".to_string());
            }
        }

        if let Some(origin) = &self.origin {
            validate_http_url("Fallback origin", origin)?;
        }

        Ok(())
    }
}
