// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session configuration.

use std::path::PathBuf;

use crm_config::CrmConfig;
use crm_core::{CrmError, CrmResult};

/// Settings the session manager needs.
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC secret for signing tokens.
    pub secret: String,
    /// Path of the token file.
    pub token_path: PathBuf,
    /// Access token lifetime in seconds.
    pub access_lifetime_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_lifetime_secs: i64,
}

impl SessionConfig {
    /// Creates a configuration with the given secret and token path.
    pub fn new(secret: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            secret: secret.into(),
            token_path: token_path.into(),
            access_lifetime_secs: crm_config::schema::DEFAULT_ACCESS_LIFETIME,
            refresh_lifetime_secs: crm_config::schema::DEFAULT_REFRESH_LIFETIME,
        }
    }

    /// Sets the access token lifetime.
    pub fn with_access_lifetime(mut self, secs: i64) -> Self {
        self.access_lifetime_secs = secs;
        self
    }

    /// Sets the refresh token lifetime.
    pub fn with_refresh_lifetime(mut self, secs: i64) -> Self {
        self.refresh_lifetime_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CrmResult<()> {
        if self.secret.is_empty() {
            return Err(CrmError::token_config("secret is not configured"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("Token secret is shorter than recommended (32 bytes)");
        }
        if self.access_lifetime_secs <= 0 || self.refresh_lifetime_secs <= 0 {
            return Err(CrmError::token_config("token lifetimes must be positive"));
        }
        Ok(())
    }
}

impl From<&CrmConfig> for SessionConfig {
    fn from(config: &CrmConfig) -> Self {
        Self::new(config.secret_key.clone(), config.token_storage.clone())
            .with_access_lifetime(config.access_lifetime)
            .with_refresh_lifetime(config.refresh_lifetime)
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("token_path", &self.token_path)
            .field("access_lifetime_secs", &self.access_lifetime_secs)
            .field("refresh_lifetime_secs", &self.refresh_lifetime_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
