// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default access token lifetime (15 minutes).
pub const DEFAULT_ACCESS_LIFETIME: i64 = 15 * 60;

/// Default refresh token lifetime (1 day).
pub const DEFAULT_REFRESH_LIFETIME: i64 = 24 * 60 * 60;

// =============================================================================
// CrmConfig
// =============================================================================

/// CRM configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// HMAC secret used to sign session tokens.
    #[serde(skip_serializing)]
    pub secret_key: String,
    /// Path to the session token file.
    pub token_storage: PathBuf,
    /// Access token lifetime in seconds.
    pub access_lifetime: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_lifetime: i64,
    /// Path to the database file.
    pub data_storage: PathBuf,
    /// Default log filter.
    pub log_level: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(), // Must be set by user
            token_storage: PathBuf::from(".crm/tokens.json"),
            access_lifetime: DEFAULT_ACCESS_LIFETIME,
            refresh_lifetime: DEFAULT_REFRESH_LIFETIME,
            data_storage: PathBuf::from(".crm/crm.json"),
            log_level: "warn".to_string(),
        }
    }
}

impl CrmConfig {
    /// Creates a configuration with the given secret and default values.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::validation("secret_key", "must not be empty"));
        }
        if self.access_lifetime <= 0 {
            return Err(ConfigError::validation(
                "access_lifetime",
                "must be a positive number of seconds",
            ));
        }
        if self.refresh_lifetime < self.access_lifetime {
            return Err(ConfigError::validation(
                "refresh_lifetime",
                "must not be shorter than the access lifetime",
            ));
        }
        if self.token_storage.as_os_str().is_empty() {
            return Err(ConfigError::validation("token_storage", "must not be empty"));
        }
        if self.data_storage.as_os_str().is_empty() {
            return Err(ConfigError::validation("data_storage", "must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for CrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmConfig")
            .field("secret_key", &"<redacted>")
            .field("token_storage", &self.token_storage)
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .field("data_storage", &self.data_storage)
            .field("log_level", &self.log_level)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_secret() {
        let config = CrmConfig::default();
        assert!(config.validate().is_err());
        assert!(CrmConfig::new("k").validate().is_ok());
    }

    #[test]
    fn test_lifetime_validation() {
        let mut config = CrmConfig::new("k");
        config.access_lifetime = 0;
        assert!(config.validate().is_err());

        let mut config = CrmConfig::new("k");
        config.access_lifetime = 600;
        config.refresh_lifetime = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", CrmConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let rendered = toml::to_string(&CrmConfig::new("super-secret")).unwrap();
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("access_lifetime"));
    }
}
