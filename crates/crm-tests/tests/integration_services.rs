// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! End-to-end tests of the services over a persisted store and a real session.

use chrono::{TimeZone, Utc};

use crm_core::{CrmError, Database, RecordId, Role, TokenFault};
use crm_service::{ClientChanges, EventChanges, NewClient, NewContract, NewEvent};
use crm_tests::prelude::*;

fn new_client(name: &str) -> NewClient {
    NewClient {
        full_name: name.to_string(),
        email: "kevin@startup.io".to_string(),
        phone: "+33 1 23 45 67 89".to_string(),
        company: "Cool Startup LLC".to_string(),
    }
}

fn new_event() -> NewEvent {
    let start = Utc.with_ymd_and_hms(2026, 6, 4, 13, 0, 0).unwrap();
    NewEvent {
        name: "John Quick Wedding".to_string(),
        location: "53 Rue du Château, Candé-sur-Beuvron".to_string(),
        attendees: 75,
        start_date: start,
        end_date: Utc.with_ymd_and_hms(2026, 6, 5, 2, 0, 0).unwrap(),
        notes: String::new(),
    }
}

/// Sam owns a client; mia drafted a contract for it. Ends logged out.
fn client_with_contract(env: &TestEnv) -> (Staff, RecordId, RecordId) {
    let staff = seed_staff(env);

    env.login("sam");
    let client = env.services.clients.create(new_client("Kevin Casey")).unwrap();
    assert_eq!(client.salesman_id, Some(staff.sam));

    env.login("mia");
    let contract = env
        .services
        .contracts
        .create(NewContract {
            client_id: client.id,
            total_amount: 1000.0,
            remaining_amount: None,
            signed: false,
        })
        .unwrap();
    assert_eq!(contract.remaining_amount, 1000.0);

    env.services.users.logout().unwrap();
    (staff, client.id, contract.id)
}

// =============================================================================
// Full Flow
// =============================================================================

#[test]
fn test_contract_to_staffed_event() {
    init_test_logging();
    let env = TestEnv::new();
    let (staff, _, contract) = client_with_contract(&env);

    // an event needs a signed contract
    env.login("sam");
    let result = env.services.events.create(contract, new_event());
    result.assert_abac_denied("(is_contract_associated_salesman and contract_is_signed)");

    let signed = env.services.contracts.sign(contract).unwrap();
    assert!(signed.signed);
    let paid = env.services.contracts.pay(contract, 250.0).unwrap();
    assert_eq!(paid.remaining_amount, 750.0);

    let event = env.services.events.create(contract, new_event()).unwrap();
    assert_eq!(event.support_id, None);

    env.login("mia");
    let staffed = env
        .services
        .events
        .modify_support(event.id, Some(staff.sid))
        .unwrap();
    assert_eq!(staffed.support_id, Some(staff.sid));

    // once staffed, the salesman loses the event to support
    env.login("sam");
    let changes = EventChanges {
        notes: Some("Wedding starts at 3PM".to_string()),
        ..Default::default()
    };
    assert!(env.services.events.update(event.id, changes.clone()).is_err());

    env.login("sid");
    let updated = env.services.events.update(event.id, changes).unwrap();
    assert_eq!(updated.notes, "Wedding starts at 3PM");
}

#[test]
fn test_other_salesman_is_kept_out() {
    let env = TestEnv::new();
    let (_, client, contract) = client_with_contract(&env);

    env.login("sue");
    env.services
        .contracts
        .sign(contract)
        .assert_abac_denied("(is_sales and is_contract_associated_salesman)");
    let changes = ClientChanges {
        company: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert!(env.services.clients.update(client, changes).is_err());

    // reads stay open to every collaborator
    assert_eq!(env.services.clients.list().unwrap().len(), 1);
    assert_eq!(env.services.contracts.get(contract).unwrap().id, contract);
}

#[test]
fn test_support_cannot_create_clients() {
    let env = TestEnv::new();
    seed_staff(&env);

    env.login("sid");
    env.services
        .clients
        .create(new_client("Lou"))
        .assert_rbac_denied(&["client:create"]);
}

#[test]
fn test_overpayment_is_rejected() {
    let env = TestEnv::new();
    let (_, _, contract) = client_with_contract(&env);

    env.login("sam");
    let result = env.services.contracts.pay(contract, 1500.0);

    assert!(matches!(result, Err(CrmError::Validation { .. })));
    assert_eq!(
        env.services.contracts.get(contract).unwrap().remaining_amount,
        1000.0
    );
}

// =============================================================================
// Collaborators
// =============================================================================

#[test]
fn test_init_only_once() {
    let env = TestEnv::new();
    seed_staff(&env);

    let result = env.services.init(new_collaborator("eve", Role::Management));

    assert!(matches!(result, Err(CrmError::Validation { .. })));
}

#[test]
fn test_deactivated_collaborator_keeps_base_permissions() {
    let env = TestEnv::new();
    let staff = seed_staff(&env);

    env.login("mia");
    env.services
        .collaborators
        .modify_role(staff.sue, Role::Deactivated)
        .unwrap();

    let identity = env.login("sue");
    assert_eq!(identity.role, Role::Deactivated);
    assert_eq!(env.services.users.whoami().unwrap().subject, "sue");
    env.services
        .clients
        .list()
        .assert_rbac_denied(&["client:read"]);
}

#[test]
fn test_management_cannot_change_own_role() {
    let env = TestEnv::new();
    let staff = seed_staff(&env);

    env.login("mia");
    env.services
        .collaborators
        .modify_role(staff.mia, Role::Sales)
        .assert_abac_denied("(is_management and not is_self)");
}

#[test]
fn test_deleting_salesman_frees_clients() {
    let env = TestEnv::new();
    let (staff, client, _) = client_with_contract(&env);

    env.login("mia");
    env.services.collaborators.delete(staff.sam).unwrap();

    assert_eq!(env.services.clients.get(client).unwrap().salesman_id, None);
    // and management may now take over the client
    let changes = ClientChanges {
        phone: Some("+33 6 00 00 00 00".to_string()),
        ..Default::default()
    };
    env.services.clients.update(client, changes).unwrap();
}

#[test]
fn test_username_change_reissues_session() {
    let env = TestEnv::new();
    seed_staff(&env);

    env.login("sam");
    let renamed = env.services.users.modify_username("samuel").unwrap();

    assert_eq!(renamed.subject, "samuel");
    assert_eq!(env.services.users.whoami().unwrap().subject, "samuel");
    assert!(env.services.users.login("sam", PASSWORD).is_err());
}

#[test]
fn test_password_change() {
    let env = TestEnv::new();
    seed_staff(&env);

    env.login("sam");
    assert!(matches!(
        env.services.users.modify_password("wrong", "new secret"),
        Err(CrmError::AuthenticationFailed)
    ));
    env.services
        .users
        .modify_password(PASSWORD, "new secret")
        .unwrap();

    assert!(env.services.users.login("sam", PASSWORD).is_err());
    env.services.users.login("sam", "new secret").unwrap();
}

#[test]
fn test_login_refuses_unknown_and_wrong_password_alike() {
    let env = TestEnv::new();
    seed_staff(&env);

    let unknown = env.services.users.login("nobody", PASSWORD).unwrap_err();
    let wrong = env.services.users.login("sam", "nope").unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
    assert!(env.stored().is_none());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_records_survive_reopen() {
    let env = TestEnv::new();
    let (staff, client, contract) = client_with_contract(&env);

    let reopened = Database::open(env.data_path()).unwrap();
    let tables = reopened.read();

    assert_eq!(tables.collaborators().count(), 4);
    assert_eq!(tables.client(client).unwrap().salesman_id, Some(staff.sam));
    assert_eq!(tables.contract(contract).unwrap().client_id, client);
}

#[test]
fn test_denied_call_leaves_store_untouched() {
    let env = TestEnv::new();
    let (_, client, _) = client_with_contract(&env);

    env.login("sue");
    assert!(env.services.clients.delete(client).is_err());

    let reopened = Database::open(env.data_path()).unwrap();
    assert!(reopened.read().client(client).is_some());
}

// =============================================================================
// Session Through The Services
// =============================================================================

#[test]
fn test_logged_out_calls_are_session_invalid() {
    let env = TestEnv::new();
    seed_staff(&env);

    env.services.users.whoami().assert_session_invalid();
    env.services.clients.list().assert_session_invalid();
    assert!(matches!(
        env.services.users.logout(),
        Err(CrmError::NoSession)
    ));
}

#[test]
fn test_services_renew_expired_access() {
    let env = TestEnv::new();
    seed_staff(&env);
    env.login("sam");

    env.clock.advance(ACCESS_LIFETIME + 10);
    assert_eq!(env.services.users.whoami().unwrap().subject, "sam");
    assert_eq!(
        env.session.verify().unwrap().exp,
        START + ACCESS_LIFETIME + 10 + ACCESS_LIFETIME
    );

    env.clock.advance(REFRESH_LIFETIME);
    env.services.users.whoami().assert_session_invalid();
    assert!(env.stored().is_none());
    env.session
        .verify()
        .assert_bad_token(TokenFault::NoAccess);
}
