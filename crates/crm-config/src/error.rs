// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while loading the CRM configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why the configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is not valid TOML or JSON for the schema.
    #[error("Cannot parse configuration '{path}': {message}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A setting has an unusable value.
    #[error("Invalid setting '{field}': {message}")]
    Validation {
        /// Setting name, as written in the file.
        field: String,
        /// Error message.
        message: String,
    },

    /// The file exists but cannot be read.
    #[error("Cannot read configuration '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An environment override cannot be parsed.
    #[error("Invalid value in ${name}: {message}")]
    InvalidEnvVar {
        /// Variable name, prefix included.
        name: String,
        /// Error message.
        message: String,
    },

    /// The file is required but absent.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The file extension is neither `.toml` nor `.json`.
    #[error("Unsupported configuration format '{format}' (expected .toml or .json)")]
    UnsupportedFormat {
        /// The unsupported format.
        format: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid environment variable error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns the setting at fault, if the error names one.
    pub fn setting(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::InvalidEnvVar { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns a hint on how to fix the error.
    pub fn hint(&self) -> String {
        match self.setting() {
            Some("secret_key") => {
                "Set SECRET_KEY in the environment or secret_key in the configuration file"
                    .to_string()
            }
            Some(setting) => format!("Check the value of '{}'", setting),
            None => "Check the configuration file passed with --config".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
