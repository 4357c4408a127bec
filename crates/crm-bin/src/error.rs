// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types of the `crm` binary and their rendering.

use thiserror::Error;

use crm_core::{CrmError, Level, Threat};

/// Result type alias for crm-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the `crm` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid or unreadable user input.
    #[error("Input error: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Config parsing error.
    #[error("{0}")]
    Config(#[from] crm_config::ConfigError),

    /// Error raised by the CRM itself.
    #[error("{0}")]
    Crm(#[from] CrmError),
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Input(_) => 2,
            Self::Io(_) => 4,
            Self::Crm(err) => match err {
                CrmError::AuthorizationDenied { .. } => 3,
                CrmError::ExpiredToken
                | CrmError::BadToken { .. }
                | CrmError::NoSession
                | CrmError::AuthenticationFailed => 5,
                CrmError::NotFound { .. }
                | CrmError::Validation { .. }
                | CrmError::UnknownRole { .. } => 6,
                CrmError::TokenConfig { .. } => 1,
                CrmError::Storage { .. } => 4,
            },
        }
    }

    /// Returns the layer that raised the error.
    pub fn level(&self) -> Level {
        match self {
            Self::Crm(err) => err.level(),
            Self::Input(_) => Level::Controller,
            _ => Level::Service,
        }
    }

    /// Returns how the error should be rendered.
    pub fn threat(&self) -> Threat {
        match self {
            Self::Crm(err) => err.threat(),
            Self::Input(_) => Threat::Warning,
            _ => Threat::Error,
        }
    }

    /// Returns a hint for the user, if any.
    pub fn tips(&self) -> Option<String> {
        match self {
            Self::Crm(err) => err.tips(),
            Self::Config(err) => Some(err.hint()),
            Self::Configuration(_) => {
                Some("Check the configuration file and the CRM environment variables".to_string())
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Input(format!("{:#}", err))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Formats an error for the terminal.
///
/// ```text
/// Error: Permission error (RBAC) in {'client:create'}
///   Level: controller
///   Tips:  Required permissions: client:create
/// ```
pub fn render_error(error: &BinError) -> String {
    let heading = match error.threat() {
        Threat::Error => "Error",
        Threat::Warning => "Warning",
    };
    let mut out = format!("{}: {}\n  Level: {}", heading, error, error.level());
    if let Some(tips) = error.tips() {
        out.push_str(&format!("\n  Tips:  {}", tips));
    }
    out
}

/// Reports an error on stderr.
pub fn report_error(error: &BinError) {
    tracing::debug!(exit_code = error.exit_code(), "Command failed: {:?}", error);
    eprintln!("{}", render_error(error));
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
