//! Edge policy validators

use super::trait_def::Validate;
use crate::config::models::*;

const SUPPORTED_TLS_VERSIONS: &[&str] = &["1.0", "1.1", "1.2", "1.3"];

impl Validate for PolicyConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in &self.security_headers {
            if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == ':') {
                return Err(format!("Invalid header name '{}'", name));
            }
            if value.contains('\n') || value.contains('\r') {
                return Err(format!("Header '{}' value contains a line break", name));
            }
        }

        for directive in self.csp.keys() {
            if directive.is_empty() || directive.contains(char::is_whitespace) || directive.contains(';') {
                return Err(format!("Invalid CSP directive name '{}'", directive));
            }
        }

        self.cors.validate()?;
        self.transport.validate()?;

        for rule in &self.cache_rules {
            rule.validate()?;
        }

        Ok(())
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.allow_methods.is_empty() {
            return Err("CORS allow_methods cannot be empty when CORS is enabled".to_string());
        }

        if let Some(origin) = &self.allow_origin {
            if origin.is_empty() {
                return Err("CORS allow_origin cannot be an empty string".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for TransportSecurityConfig {
    fn validate(&self) -> Result<(), String> {
        if !SUPPORTED_TLS_VERSIONS.contains(&self.min_tls_version.as_str()) {
            return Err(format!(
                "Unsupported minimum TLS version '{}', expected one of {:?}",
                self.min_tls_version, SUPPORTED_TLS_VERSIONS
            ));
        }

        Ok(())
    }
}

impl Validate for CacheRule {
    fn validate(&self) -> Result<(), String> {
        if self.pattern.is_empty() {
            return Err("Cache rule pattern cannot be empty".to_string());
        }

        if self.pattern.matches('*').count() > 1 {
            return Err(format!(
                "Cache rule '{}' may contain at most one wildcard",
                self.pattern
            ));
        }

        if self.bypass && self.immutable {
            return Err(format!(
                "Cache rule '{}' cannot be both bypass and immutable",
                self.pattern
            ));
        }

        Ok(())
    }
}
