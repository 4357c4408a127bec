// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Domain records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CrmError, CrmResult};
use crate::role::Role;

/// Primary key of every record.
pub type RecordId = u32;

// =============================================================================
// Collaborator
// =============================================================================

/// A staff member with a login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    /// Primary key.
    pub id: RecordId,
    /// Login name, unique.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Current role.
    pub role: Role,
}

impl Collaborator {
    /// Returns "first last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A customer, optionally owned by a salesman.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Primary key.
    pub id: RecordId,
    /// Contact name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Company name.
    pub company: String,
    /// Collaborator in charge.
    pub salesman_id: Option<RecordId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Contract
// =============================================================================

/// A contract with a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Primary key.
    pub id: RecordId,
    /// Client the contract belongs to.
    pub client_id: RecordId,
    /// Total amount.
    pub total_amount: f64,
    /// Amount still due.
    pub remaining_amount: f64,
    /// Whether the client signed.
    pub signed: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// Checks amount consistency.
    pub fn validate(&self) -> CrmResult<()> {
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(CrmError::validation(
                "total_amount",
                "must be a non-negative amount",
            ));
        }
        if !self.remaining_amount.is_finite()
            || self.remaining_amount < 0.0
            || self.remaining_amount > self.total_amount
        {
            return Err(CrmError::validation(
                "remaining_amount",
                "must be between 0 and the total amount",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Event
// =============================================================================

/// An event organised under a signed contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Primary key.
    pub id: RecordId,
    /// Contract the event belongs to.
    pub contract_id: RecordId,
    /// Support collaborator in charge.
    pub support_id: Option<RecordId>,
    /// Event name.
    pub name: String,
    /// Location.
    pub location: String,
    /// Expected attendees.
    pub attendees: u32,
    /// Start time.
    pub start_date: DateTime<Utc>,
    /// End time.
    pub end_date: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl Event {
    /// Checks date ordering.
    pub fn validate(&self) -> CrmResult<()> {
        if self.end_date < self.start_date {
            return Err(CrmError::validation(
                "end_date",
                "must not be before the start date",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_contract_validation() {
        let mut contract = Contract {
            id: 1,
            client_id: 1,
            total_amount: 100.0,
            remaining_amount: 40.0,
            signed: false,
            created_at: Utc::now(),
        };
        assert!(contract.validate().is_ok());

        contract.remaining_amount = 140.0;
        assert!(contract.validate().is_err());

        contract.total_amount = -1.0;
        assert!(contract.validate().is_err());
    }

    #[test]
    fn test_event_validation() {
        let start = Utc::now();
        let mut event = Event {
            id: 1,
            contract_id: 1,
            support_id: None,
            name: "Launch".to_string(),
            location: "Paris".to_string(),
            attendees: 50,
            start_date: start,
            end_date: start + Duration::hours(4),
            notes: String::new(),
        };
        assert!(event.validate().is_ok());

        event.end_date = start - Duration::hours(1);
        assert!(event.validate().is_err());
    }
}
