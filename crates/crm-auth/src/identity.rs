// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authenticated identity.

use serde::{Deserialize, Serialize};

use crm_core::{CrmError, CrmResult, Denial, RecordId, Role};

use crate::claims::AccessClaims;

/// The caller of a guarded operation.
///
/// Produced per call from a verified access token and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Username.
    pub subject: String,
    /// Collaborator id.
    pub collaborator_id: RecordId,
    /// Role at login time.
    pub role: Role,
    /// Display name.
    pub display_name: String,
}

impl Identity {
    /// Creates an identity.
    pub fn new(
        subject: impl Into<String>,
        collaborator_id: RecordId,
        role: Role,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            collaborator_id,
            role,
            display_name: display_name.into(),
        }
    }

    /// Builds an identity from verified access claims.
    pub fn from_claims(claims: &AccessClaims) -> CrmResult<Self> {
        Ok(Self {
            subject: claims.sub.clone(),
            collaborator_id: claims.c_id,
            role: Role::from_code(i64::from(claims.role))?,
            display_name: claims.name.clone(),
        })
    }
}

// =============================================================================
// IdentityProvider
// =============================================================================

/// Source of the current identity.
pub trait IdentityProvider: Send + Sync {
    /// Returns the authenticated caller or an `AuthorizationDenied` error.
    fn current_identity(&self) -> CrmResult<Identity>;
}

/// Converts a session failure into a denial.
///
/// Token and role failures become `Authentication invalid` with the original
/// message as tips. Storage and configuration errors pass through.
pub fn session_denial(err: CrmError) -> CrmError {
    match err {
        CrmError::ExpiredToken
        | CrmError::BadToken { .. }
        | CrmError::NoSession
        | CrmError::UnknownRole { .. } => CrmError::denied(Denial::SessionInvalid, err.to_string()),
        other => other,
    }
}

/// An identity provider that always yields the same caller.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub Identity);

impl IdentityProvider for FixedIdentity {
    fn current_identity(&self) -> CrmResult<Identity> {
        Ok(self.0.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::{Level, TokenFault};

    #[test]
    fn test_from_claims() {
        let claims = AccessClaims {
            sub: "alice".to_string(),
            c_id: 7,
            role: 3,
            name: "A L".to_string(),
            iat: 1000,
            exp: 1030,
        };
        let identity = Identity::from_claims(&claims).unwrap();
        assert_eq!(identity, Identity::new("alice", 7, Role::Management, "A L"));

        let bad = AccessClaims { role: 9, ..claims };
        assert!(matches!(
            Identity::from_claims(&bad),
            Err(CrmError::UnknownRole { .. })
        ));
    }

    #[test]
    fn test_session_denial() {
        let err = session_denial(CrmError::bad_token(TokenFault::InvalidRefresh));
        assert_eq!(err.to_string(), "Authentication invalid");
        assert_eq!(err.level(), Level::Controller);
        assert_eq!(err.tips().as_deref(), Some("Invalid refresh token"));

        let err = session_denial(CrmError::storage("disk full"));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
