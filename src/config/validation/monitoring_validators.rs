//! Security scan and monitoring validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for SecurityScanConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(format!(
                "Security threshold must be between 0 and 100, got {}",
                self.threshold
            ));
        }

        if self.max_redirect_depth == 0 {
            return Err("Maximum redirect depth must be greater than 0".to_string());
        }

        if self.rate_limit_burst == 0 {
            return Err("Rate limit burst must be greater than 0".to_string());
        }

        if let Some(path) = self.sensitive_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(format!("Sensitive path '{}' must start with '/'", path));
        }

        Ok(())
    }
}

impl Validate for MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_ms == 0 {
            return Err("Monitoring interval must be greater than 0".to_string());
        }

        if let Some(path) = self.sub_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(format!("Monitored path '{}' must start with '/'", path));
        }

        if self.retention_hours == 0 {
            return Err("Metric retention must be at least one hour".to_string());
        }

        self.thresholds.validate()
    }
}

impl Validate for AlertThresholds {
    fn validate(&self) -> Result<(), String> {
        if self.response_time_ms <= 0.0 {
            return Err("Response time threshold must be positive".to_string());
        }

        if !(0.0..=100.0).contains(&self.availability) {
            return Err("Availability threshold must be a percentage".to_string());
        }

        if !(0.0..=100.0).contains(&self.error_rate) {
            return Err("Error rate threshold must be a percentage".to_string());
        }

        Ok(())
    }
}
