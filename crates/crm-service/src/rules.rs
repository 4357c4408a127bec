// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access rules of every guarded operation.

use once_cell::sync::Lazy;

use crm_auth::checks::*;
use crm_auth::{predicate, Rule};

// =============================================================================
// Users
// =============================================================================

/// `user.whoami`
pub static USER_WHOAMI: Lazy<Rule> = Lazy::new(|| Rule::new(["user:whoami"]));

/// `user.modify_password`
pub static USER_MODIFY_PASSWORD: Lazy<Rule> =
    Lazy::new(|| Rule::new(["user:modify_password_own"]));

/// `user.modify_username`
pub static USER_MODIFY_USERNAME: Lazy<Rule> =
    Lazy::new(|| Rule::new(["user:modify_username_own"]));

/// `user.list`
pub static USER_LIST: Lazy<Rule> = Lazy::new(|| Rule::new(["user:read"]).without_identity());

// =============================================================================
// Collaborators
// =============================================================================

/// `collaborator.list` and `collaborator.get`
pub static COLLABORATOR_READ: Lazy<Rule> =
    Lazy::new(|| Rule::new(["collaborator:read"]).without_identity());

/// `collaborator.create`
pub static COLLABORATOR_CREATE: Lazy<Rule> = Lazy::new(|| Rule::new(["collaborator:create"]));

/// `collaborator.update`
pub static COLLABORATOR_UPDATE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["collaborator:update_self", "collaborator:update_any"])
        .abac(predicate!(is_self) | predicate!(is_management))
});

/// `collaborator.delete`
pub static COLLABORATOR_DELETE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["collaborator:delete_self", "collaborator:delete_any"])
        .abac(predicate!(is_self) | predicate!(is_management))
});

/// `collaborator.modify_role`
pub static COLLABORATOR_MODIFY_ROLE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["collaborator:modify_role"]).abac(predicate!(is_management) & !predicate!(is_self))
});

// =============================================================================
// Clients
// =============================================================================

/// `client.list` and `client.get`
pub static CLIENT_READ: Lazy<Rule> = Lazy::new(|| Rule::new(["client:read"]).without_identity());

/// `client.create`
pub static CLIENT_CREATE: Lazy<Rule> = Lazy::new(|| Rule::new(["client:create"]));

/// `client.update`
pub static CLIENT_UPDATE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["client:update_own", "client:update_unassigned"]).abac(
        (predicate!(is_sales) & predicate!(is_client_associated_salesman))
            | (predicate!(is_management) & !predicate!(client_has_salesman)),
    )
});

/// `client.delete`
pub static CLIENT_DELETE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["client:delete_own", "client:delete_unassigned"]).abac(
        (predicate!(is_sales) & predicate!(is_client_associated_salesman))
            | (predicate!(is_management) & !predicate!(client_has_salesman)),
    )
});

// =============================================================================
// Contracts
// =============================================================================

/// `contract.list` and `contract.get`
pub static CONTRACT_READ: Lazy<Rule> =
    Lazy::new(|| Rule::new(["contract:read"]).without_identity());

/// `contract.create`
pub static CONTRACT_CREATE: Lazy<Rule> = Lazy::new(|| Rule::new(["contract:create"]));

/// `contract.delete`
pub static CONTRACT_DELETE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["contract:delete_own", "contract:delete_unassigned"]).abac(
        (predicate!(is_sales) & predicate!(is_contract_associated_salesman))
            | (predicate!(is_management) & !predicate!(contract_has_salesman)),
    )
});

fn own_contract(tag: &str) -> Rule {
    Rule::new([tag]).abac(predicate!(is_sales) & predicate!(is_contract_associated_salesman))
}

/// `contract.sign`
pub static CONTRACT_SIGN: Lazy<Rule> = Lazy::new(|| own_contract("contract:sign_own"));

/// `contract.modify_total`
pub static CONTRACT_MODIFY_TOTAL: Lazy<Rule> =
    Lazy::new(|| own_contract("contract:modify_total_own"));

/// `contract.pay`
pub static CONTRACT_PAY: Lazy<Rule> = Lazy::new(|| own_contract("contract:pay_own"));

// =============================================================================
// Events
// =============================================================================

/// `event.list` and `event.get`
pub static EVENT_READ: Lazy<Rule> = Lazy::new(|| Rule::new(["event:read"]).without_identity());

/// `event.create`; the target is the contract.
pub static EVENT_CREATE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["event:create"])
        .abac(predicate!(is_contract_associated_salesman) & predicate!(contract_is_signed))
});

/// `event.update`
pub static EVENT_UPDATE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["event:update_own", "event:update_unassigned"]).abac(
        (predicate!(is_support) & predicate!(is_event_associated_support))
            | (predicate!(is_sales)
                & predicate!(is_event_associated_salesman)
                & !predicate!(event_has_support)),
    )
});

/// `event.modify_support`
pub static EVENT_MODIFY_SUPPORT: Lazy<Rule> =
    Lazy::new(|| Rule::new(["event:modify_support"]).abac(predicate!(is_management)));

/// `event.delete`
pub static EVENT_DELETE: Lazy<Rule> = Lazy::new(|| {
    Rule::new(["event:delete", "event:delete_unassigned"]).abac(
        predicate!(is_management)
            | (predicate!(is_sales)
                & predicate!(is_event_associated_salesman)
                & !predicate!(event_has_support)),
    )
});

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn label(rule: &Rule) -> &str {
        rule.predicate().map(|p| p.label()).unwrap_or("")
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(&COLLABORATOR_UPDATE), "(is_self or is_management)");
        assert_eq!(label(&COLLABORATOR_MODIFY_ROLE), "(is_management and not is_self)");
        assert_eq!(
            label(&CLIENT_UPDATE),
            "((is_sales and is_client_associated_salesman) or (is_management and not client_has_salesman))"
        );
        assert_eq!(
            label(&EVENT_UPDATE),
            "((is_support and is_event_associated_support) or ((is_sales and is_event_associated_salesman) and not event_has_support))"
        );
        assert_eq!(label(&CONTRACT_PAY), "(is_sales and is_contract_associated_salesman)");
    }

    #[test]
    fn test_read_rules_have_no_predicate() {
        for rule in [&*COLLABORATOR_READ, &*CLIENT_READ, &*CONTRACT_READ, &*EVENT_READ] {
            assert!(rule.predicate().is_none());
        }
    }
}
