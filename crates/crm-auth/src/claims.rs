// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims.

use serde::{Deserialize, Serialize};

use crm_core::RecordId;

use crate::identity::Identity;

/// Claims carrying an expiry.
pub trait Expiring {
    /// Expiration time (Unix timestamp).
    fn exp(&self) -> i64;
}

// =============================================================================
// AccessClaims
// =============================================================================

/// Claims of the short-lived access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (username).
    pub sub: String,
    /// Collaborator id.
    pub c_id: RecordId,
    /// Role code.
    pub role: u8,
    /// Display name.
    pub name: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl AccessClaims {
    /// Creates claims for `identity` valid for `lifetime` seconds from `now`.
    pub fn new(identity: &Identity, now: i64, lifetime: i64) -> Self {
        Self {
            sub: identity.subject.clone(),
            c_id: identity.collaborator_id,
            role: identity.role.code(),
            name: identity.display_name.clone(),
            iat: now,
            exp: now + lifetime,
        }
    }

    /// Returns the same identity with a fresh validity window.
    pub fn renewed(&self, now: i64, lifetime: i64) -> Self {
        Self {
            iat: now,
            exp: now + lifetime,
            ..self.clone()
        }
    }
}

impl Expiring for AccessClaims {
    fn exp(&self) -> i64 {
        self.exp
    }
}

// =============================================================================
// RefreshClaims
// =============================================================================

/// Claims of the refresh token. Only proves continuity of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshClaims {
    /// Subject (username).
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl RefreshClaims {
    /// Creates claims for `subject` valid for `lifetime` seconds from `now`.
    pub fn new(subject: impl Into<String>, now: i64, lifetime: i64) -> Self {
        Self {
            sub: subject.into(),
            iat: now,
            exp: now + lifetime,
        }
    }
}

impl Expiring for RefreshClaims {
    fn exp(&self) -> i64 {
        self.exp
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::Role;

    #[test]
    fn test_access_claims_from_identity() {
        let identity = Identity::new("alice", 7, Role::Management, "A L");
        let claims = AccessClaims::new(&identity, 1000, 30);

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.c_id, 7);
        assert_eq!(claims.role, 3);
        assert_eq!(claims.iat, 1000);
        assert_eq!(claims.exp, 1030);
    }

    #[test]
    fn test_renewed_keeps_identity() {
        let identity = Identity::new("alice", 7, Role::Management, "A L");
        let claims = AccessClaims::new(&identity, 1000, 30).renewed(1040, 30);

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.name, "A L");
        assert_eq!(claims.iat, 1040);
        assert_eq!(claims.exp, 1070);
    }

    #[test]
    fn test_wire_field_names() {
        let claims = RefreshClaims::new("alice", 1000, 300);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "alice");
        assert_eq!(json["exp"], 1300);
    }
}
