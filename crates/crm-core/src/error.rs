// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CRM error types.
//!
//! Every failure in the CRM is a [`CrmError`]. Besides its kind, an error is
//! classified by a [`Level`] (which layer raised it) and a [`Threat`] (how
//! loudly the CLI should render it), and may carry `tips` for the user.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for CRM operations.
pub type CrmResult<T> = Result<T, CrmError>;

// =============================================================================
// Level / Threat
// =============================================================================

/// Layer that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Domain rules (roles, field values).
    Domain,
    /// Services and infrastructure (tokens, storage).
    Service,
    /// Entry points guarding operations.
    Controller,
}

impl Level {
    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Domain => "domain",
            Level::Service => "service",
            Level::Controller => "controller",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity used by the CLI renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Threat {
    /// The command failed.
    Error,
    /// The command did nothing, but nothing is broken.
    Warning,
}

impl Threat {
    /// Returns the threat name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Threat::Error => "error",
            Threat::Warning => "warning",
        }
    }
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TokenFault
// =============================================================================

/// Why a stored session could not be turned into valid access claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenFault {
    /// No token file, or a malformed one.
    NoAccess,
    /// Bad signature, malformed token or unsupported algorithm.
    Invalid,
    /// The access token expired and no refresh token is stored.
    MissingRefresh,
    /// The access token expired and the refresh token is unusable.
    InvalidRefresh,
}

impl TokenFault {
    /// Returns the message shown for this fault.
    pub fn message(&self) -> &'static str {
        match self {
            TokenFault::NoAccess => "No access token found",
            TokenFault::Invalid => "Invalid token",
            TokenFault::MissingRefresh => "Missing refresh token",
            TokenFault::InvalidRefresh => "Invalid refresh token",
        }
    }
}

impl fmt::Display for TokenFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// Denial
// =============================================================================

/// Reason an authorization check refused a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The caller's role grants none of the required tags.
    Rbac {
        /// Required tags, sorted.
        tags: Vec<String>,
    },
    /// The attribute predicate evaluated to false.
    Abac {
        /// Label of the failing predicate.
        label: String,
    },
    /// No valid session could be established.
    SessionInvalid,
}

impl Denial {
    /// Creates an RBAC denial; tags are sorted so the message is stable.
    pub fn rbac<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        tags.sort();
        tags.dedup();
        Denial::Rbac { tags }
    }

    /// Creates an ABAC denial.
    pub fn abac(label: impl Into<String>) -> Self {
        Denial::Abac {
            label: label.into(),
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Rbac { tags } => {
                let rendered: Vec<String> = tags.iter().map(|t| format!("'{}'", t)).collect();
                write!(f, "Permission error (RBAC) in {{{}}}", rendered.join(", "))
            }
            Denial::Abac { label } => write!(f, "Permission error (ABAC) in {}", label),
            Denial::SessionInvalid => f.write_str("Authentication invalid"),
        }
    }
}

// =============================================================================
// CrmError
// =============================================================================

/// CRM error type.
#[derive(Debug, Error)]
pub enum CrmError {
    /// A token was validly signed but its `exp` has passed.
    #[error("Token has expired")]
    ExpiredToken,

    /// The stored session is unusable.
    #[error("{fault}")]
    BadToken {
        /// What is wrong with the session.
        fault: TokenFault,
    },

    /// The token codec is misconfigured.
    #[error("Token configuration error: {message}")]
    TokenConfig {
        /// Error message.
        message: String,
    },

    /// Logout was requested but no session exists.
    #[error("No active session")]
    NoSession,

    /// Wrong username or password.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// A guard refused the call.
    #[error("{denial}")]
    AuthorizationDenied {
        /// Why the call was refused.
        denial: Denial,
        /// Layer that refused it.
        level: Level,
        /// Hint for the user.
        tips: Option<String>,
    },

    /// A role code or name did not match any role.
    #[error("Unknown role: {value}")]
    UnknownRole {
        /// The offending value.
        value: String,
    },

    /// A record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Requested identifier.
        id: String,
    },

    /// A field value was rejected.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// The database or token file could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },
}

impl CrmError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a bad token error.
    pub fn bad_token(fault: TokenFault) -> Self {
        Self::BadToken { fault }
    }

    /// Creates a token configuration error.
    pub fn token_config(message: impl Into<String>) -> Self {
        Self::TokenConfig {
            message: message.into(),
        }
    }

    /// Creates a controller-level authorization denial.
    pub fn denied(denial: Denial, tips: impl Into<String>) -> Self {
        Self::AuthorizationDenied {
            denial,
            level: Level::Controller,
            tips: Some(tips.into()),
        }
    }

    /// Creates an unknown role error.
    pub fn unknown_role(value: impl fmt::Display) -> Self {
        Self::UnknownRole {
            value: value.to_string(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the layer that raised this error.
    pub fn level(&self) -> Level {
        match self {
            CrmError::ExpiredToken
            | CrmError::BadToken { .. }
            | CrmError::TokenConfig { .. }
            | CrmError::NotFound { .. }
            | CrmError::Storage { .. } => Level::Service,
            CrmError::NoSession | CrmError::AuthenticationFailed => Level::Controller,
            CrmError::AuthorizationDenied { level, .. } => *level,
            CrmError::UnknownRole { .. } | CrmError::Validation { .. } => Level::Domain,
        }
    }

    /// Returns how the CLI should render this error.
    pub fn threat(&self) -> Threat {
        match self {
            CrmError::NoSession | CrmError::NotFound { .. } | CrmError::Validation { .. } => {
                Threat::Warning
            }
            _ => Threat::Error,
        }
    }

    /// Returns a hint for the user, if any.
    pub fn tips(&self) -> Option<String> {
        match self {
            CrmError::ExpiredToken | CrmError::BadToken { .. } => {
                Some("Please login again".to_string())
            }
            CrmError::NoSession => Some("You are already logged out".to_string()),
            CrmError::AuthenticationFailed => {
                Some("Check your username and password".to_string())
            }
            CrmError::AuthorizationDenied { tips, .. } => tips.clone(),
            CrmError::UnknownRole { .. } => {
                Some("Valid roles: DEACTIVATED, ADMIN, MANAGEMENT, SALES, SUPPORT".to_string())
            }
            _ => None,
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            CrmError::ExpiredToken => "EXPIRED_TOKEN",
            CrmError::BadToken { .. } => "BAD_TOKEN",
            CrmError::TokenConfig { .. } => "TOKEN_CONFIG",
            CrmError::NoSession => "NO_SESSION",
            CrmError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            CrmError::AuthorizationDenied { .. } => "AUTHORIZATION_DENIED",
            CrmError::UnknownRole { .. } => "UNKNOWN_ROLE",
            CrmError::NotFound { .. } => "NOT_FOUND",
            CrmError::Validation { .. } => "VALIDATION_ERROR",
            CrmError::Storage { .. } => "STORAGE_ERROR",
        }
    }

    /// Returns the denial carried by an authorization error.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            CrmError::AuthorizationDenied { denial, .. } => Some(denial),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CrmError {
    fn from(err: std::io::Error) -> Self {
        CrmError::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        CrmError::storage(format!("Invalid JSON: {}", err))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rbac_denial_message() {
        let denial = Denial::rbac(["user:read"]);
        assert_eq!(denial.to_string(), "Permission error (RBAC) in {'user:read'}");

        let denial = Denial::rbac(["client:update_unassigned", "client:update_own"]);
        assert_eq!(
            denial.to_string(),
            "Permission error (RBAC) in {'client:update_own', 'client:update_unassigned'}"
        );
    }

    #[test]
    fn test_abac_and_session_denial_messages() {
        let err = CrmError::denied(Denial::abac("(is_sales and is_self)"), "nope");
        assert_eq!(err.to_string(), "Permission error (ABAC) in (is_sales and is_self)");

        let err = CrmError::denied(Denial::SessionInvalid, "login");
        assert_eq!(err.to_string(), "Authentication invalid");
        assert_eq!(err.level(), Level::Controller);
        assert_eq!(err.threat(), Threat::Error);
        assert_eq!(err.tips().as_deref(), Some("login"));
    }

    #[test]
    fn test_bad_token_message() {
        let err = CrmError::bad_token(TokenFault::InvalidRefresh);
        assert_eq!(err.to_string(), "Invalid refresh token");
        assert_eq!(err.error_code(), "BAD_TOKEN");
    }

    #[test]
    fn test_levels_and_threats() {
        assert_eq!(CrmError::NoSession.threat(), Threat::Warning);
        assert_eq!(CrmError::unknown_role(9).level(), Level::Domain);
        assert_eq!(CrmError::ExpiredToken.level(), Level::Service);
        assert_eq!(CrmError::not_found("Client", 3).to_string(), "Client not found: 3");
    }
}
