//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.body_limit_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_mb must be > 0".into(),
            ));
        }
        if !self.model.endpoint.starts_with("http://")
            && !self.model.endpoint.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "model.endpoint must be an http(s) URL, got '{}'",
                self.model.endpoint
            )));
        }
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.name must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.model.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "model.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
