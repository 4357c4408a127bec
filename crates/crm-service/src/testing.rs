// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Seeded records shared by the service unit tests.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use once_cell::sync::Lazy;

use crm_auth::{hash_password, FixedIdentity, Guard};
use crm_core::{Client, Collaborator, Contract, Database, Event, RecordId, Role};

use crate::user::identity_of;

pub const PASSWORD: &str = "correct horse";

static PASSWORD_HASH: Lazy<String> =
    Lazy::new(|| hash_password(PASSWORD).unwrap());

pub const MIA: RecordId = 1; // management
pub const SAM: RecordId = 2; // sales, owns CLIENT_SAM
pub const SUE: RecordId = 3; // sales, owns nothing
pub const SID: RecordId = 4; // support on EVENT_STAFFED
pub const DAN: RecordId = 5; // deactivated

pub const CLIENT_SAM: RecordId = 1;
pub const CLIENT_FREE: RecordId = 2;

pub const CONTRACT_SIGNED: RecordId = 1;
pub const CONTRACT_UNSIGNED: RecordId = 2;

pub const EVENT_STAFFED: RecordId = 1;
pub const EVENT_OPEN: RecordId = 2;

fn collaborator(username: &str, role: Role) -> Collaborator {
    Collaborator {
        id: 0,
        username: username.to_string(),
        password_hash: PASSWORD_HASH.clone(),
        first_name: username.to_uppercase(),
        last_name: "Test".to_string(),
        email: format!("{}@epic.events", username),
        role,
    }
}

/// A database with two clients, two contracts of SAM and two events.
pub fn seeded() -> Arc<Database> {
    let db = Database::in_memory();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    {
        let mut scope = db.write();
        for (name, role) in [
            ("mia", Role::Management),
            ("sam", Role::Sales),
            ("sue", Role::Sales),
            ("sid", Role::Support),
            ("dan", Role::Deactivated),
        ] {
            scope.insert_collaborator(collaborator(name, role)).unwrap();
        }

        for (name, salesman) in [("Kevin Casey", Some(SAM)), ("Lou Free", None)] {
            scope
                .insert_client(Client {
                    id: 0,
                    full_name: name.to_string(),
                    email: "contact@startup.io".to_string(),
                    phone: "+33 1 23 45 67 89".to_string(),
                    company: "Startup".to_string(),
                    salesman_id: salesman,
                    created_at: now,
                    updated_at: now,
                })
                .unwrap();
        }

        for signed in [true, false] {
            scope
                .insert_contract(Contract {
                    id: 0,
                    client_id: CLIENT_SAM,
                    total_amount: 1000.0,
                    remaining_amount: 600.0,
                    signed,
                    created_at: now,
                })
                .unwrap();
        }

        for support in [Some(SID), None] {
            scope
                .insert_event(Event {
                    id: 0,
                    contract_id: CONTRACT_SIGNED,
                    support_id: support,
                    name: "Launch party".to_string(),
                    location: "Paris".to_string(),
                    attendees: 80,
                    start_date: now + Duration::days(30),
                    end_date: now + Duration::days(30) + Duration::hours(5),
                    notes: String::new(),
                })
                .unwrap();
        }
        scope.commit().unwrap();
    }
    Arc::new(db)
}

/// A guard that always sees the given collaborator as caller.
pub fn guard_as(db: &Arc<Database>, id: RecordId) -> Guard {
    let identity = identity_of(db.read().collaborator(id).unwrap());
    Guard::new(Arc::new(FixedIdentity(identity)), db.clone())
}
