// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Environment Override
//!
//! Every field can be overridden by an environment variable named after the
//! upper-cased field, optionally prefixed:
//!
//! ```text
//! SECRET_KEY=change-me
//! TOKEN_STORAGE=/home/me/.crm/tokens.json
//! ACCESS_LIFETIME=300
//! REFRESH_LIFETIME=86400
//! DATA_STORAGE=/home/me/.crm/crm.json
//! LOG_LEVEL=debug
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::CrmConfig;

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("<none>")),
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for the CRM.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix; empty means bare keys.
    env_prefix: String,
    /// Whether a missing file is an error.
    require_file: bool,
    /// Whether to resolve relative paths against the file directory.
    resolve_paths: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader reading bare environment keys, tolerating a missing file.
    pub fn new() -> Self {
        Self {
            env_prefix: String::new(),
            require_file: false,
            resolve_paths: true,
        }
    }

    /// Sets the environment variable prefix (`CRM` reads `CRM_SECRET_KEY`).
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Makes a missing configuration file an error.
    pub fn require_file(mut self, required: bool) -> Self {
        self.require_file = required;
        self
    }

    /// Enables or disables relative path resolution.
    pub fn with_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_paths = enabled;
        self
    }

    /// Loads configuration from a file and the process environment.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<CrmConfig> {
        self.load_with(path, |key| env::var(key).ok())
    }

    /// Loads configuration from a file and a custom variable lookup.
    pub fn load_with<F>(&self, path: impl AsRef<Path>, lookup: F) -> ConfigResult<CrmConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();

        let mut config = if path.exists() {
            info!("Loading configuration from: {}", path.display());
            let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
            self.parse_str(&content, ConfigFormat::from_path(path)?)
                .map_err(|e| match e {
                    ConfigError::Parse { message, .. } => ConfigError::parse(path, message),
                    other => other,
                })?
        } else if self.require_file {
            return Err(ConfigError::file_not_found(path));
        } else {
            debug!("No configuration file at {}, using defaults", path.display());
            CrmConfig::default()
        };

        self.apply_overrides(&mut config, lookup)?;

        if self.resolve_paths {
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            resolve_relative_paths(&mut config, &base);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration content without overrides or validation.
    pub fn parse_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<CrmConfig> {
        match format {
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::parse("<string>", e.to_string()))
            }
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::parse("<string>", e.to_string())),
        }
    }

    /// Applies overrides from a variable lookup.
    pub fn apply_overrides<F>(&self, config: &mut CrmConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(&self.key("SECRET_KEY")) {
            config.secret_key = value;
        }
        if let Some(value) = lookup(&self.key("TOKEN_STORAGE")) {
            config.token_storage = PathBuf::from(value);
        }
        if let Some(value) = lookup(&self.key("DATA_STORAGE")) {
            config.data_storage = PathBuf::from(value);
        }
        if let Some(value) = lookup(&self.key("ACCESS_LIFETIME")) {
            config.access_lifetime = self.parse_seconds("ACCESS_LIFETIME", &value)?;
        }
        if let Some(value) = lookup(&self.key("REFRESH_LIFETIME")) {
            config.refresh_lifetime = self.parse_seconds("REFRESH_LIFETIME", &value)?;
        }
        if let Some(value) = lookup(&self.key("LOG_LEVEL")) {
            config.log_level = value;
        }
        Ok(())
    }

    fn key(&self, name: &str) -> String {
        if self.env_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.env_prefix, name)
        }
    }

    fn parse_seconds(&self, name: &str, value: &str) -> ConfigResult<i64> {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_env_var(self.key(name), "expected a number of seconds"))
    }
}

/// Resolves relative storage paths against `base`.
fn resolve_relative_paths(config: &mut CrmConfig, base: &Path) {
    if config.token_storage.is_relative() {
        config.token_storage = base.join(&config.token_storage);
    }
    if config.data_storage.is_relative() {
        config.data_storage = base.join(&config.data_storage);
    }
}

/// Loads configuration with the default loader.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<CrmConfig> {
    ConfigLoader::new().load(path)
}

// =============================================================================
// Tests
// =============================================================================
