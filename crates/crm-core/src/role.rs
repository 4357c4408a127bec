// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Staff roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrmError;

/// Staff roles with stable integer codes.
///
/// Roles are stored and carried in tokens as their code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    /// Former staff; can only manage their own account.
    Deactivated = 1,
    /// Reserved; base permissions only.
    Admin = 2,
    /// Manages collaborators, contracts and event staffing.
    Management = 3,
    /// Owns clients and their contracts.
    Sales = 4,
    /// Runs events.
    Support = 5,
}

impl Role {
    /// Returns the integer code.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Returns the role for an integer code.
    pub fn from_code(code: i64) -> Result<Self, CrmError> {
        match code {
            1 => Ok(Role::Deactivated),
            2 => Ok(Role::Admin),
            3 => Ok(Role::Management),
            4 => Ok(Role::Sales),
            5 => Ok(Role::Support),
            other => Err(CrmError::unknown_role(other)),
        }
    }

    /// Returns the uppercase role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Deactivated => "DEACTIVATED",
            Role::Admin => "ADMIN",
            Role::Management => "MANAGEMENT",
            Role::Sales => "SALES",
            Role::Support => "SUPPORT",
        }
    }

    /// Parses a role from its name (case-insensitive) or its code.
    pub fn parse(s: &str) -> Result<Self, CrmError> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Role::from_code(code);
        }
        match s.to_uppercase().as_str() {
            "DEACTIVATED" => Ok(Role::Deactivated),
            "ADMIN" => Ok(Role::Admin),
            "MANAGEMENT" => Ok(Role::Management),
            "SALES" => Ok(Role::Sales),
            "SUPPORT" => Ok(Role::Support),
            _ => Err(CrmError::unknown_role(s)),
        }
    }

    /// Returns all roles in code order.
    pub fn all() -> &'static [Role] {
        &[
            Role::Deactivated,
            Role::Admin,
            Role::Management,
            Role::Sales,
            Role::Support,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

impl TryFrom<u8> for Role {
    type Error = CrmError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Role::from_code(i64::from(code))
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

// =============================================================================
// Tests
// =============================================================================
