// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Named checks for attribute rules.
//!
//! Lift them with [`predicate!`](crate::predicate!). A check that needs a
//! target record returns `false` when the call has no `pk` or the row is
//! missing.

use crm_core::Role;

use crate::context::Context;

// =============================================================================
// Caller
// =============================================================================

/// The caller is in management.
pub fn is_management(ctx: &Context<'_>) -> bool {
    ctx.auth.role == Role::Management
}

/// The caller is a salesman.
pub fn is_sales(ctx: &Context<'_>) -> bool {
    ctx.auth.role == Role::Sales
}

/// The caller is in support.
pub fn is_support(ctx: &Context<'_>) -> bool {
    ctx.auth.role == Role::Support
}

/// The target collaborator is the caller.
pub fn is_self(ctx: &Context<'_>) -> bool {
    ctx.pk == Some(ctx.auth.collaborator_id)
}

// =============================================================================
// Clients
// =============================================================================

/// The target client has a salesman.
pub fn client_has_salesman(ctx: &Context<'_>) -> bool {
    ctx.pk
        .and_then(|pk| ctx.perm_service.client_salesman(pk))
        .is_some()
}

/// The caller is the target client's salesman.
pub fn is_client_associated_salesman(ctx: &Context<'_>) -> bool {
    ctx.pk.and_then(|pk| ctx.perm_service.client_salesman(pk)) == Some(ctx.auth.collaborator_id)
}

// =============================================================================
// Contracts
// =============================================================================

/// The target contract's client has a salesman.
pub fn contract_has_salesman(ctx: &Context<'_>) -> bool {
    ctx.pk
        .and_then(|pk| ctx.perm_service.contract_salesman(pk))
        .is_some()
}

/// The caller is the salesman of the target contract's client.
pub fn is_contract_associated_salesman(ctx: &Context<'_>) -> bool {
    ctx.pk.and_then(|pk| ctx.perm_service.contract_salesman(pk))
        == Some(ctx.auth.collaborator_id)
}

/// The target contract is signed.
pub fn contract_is_signed(ctx: &Context<'_>) -> bool {
    ctx.pk.and_then(|pk| ctx.perm_service.contract_signed(pk)) == Some(true)
}

// =============================================================================
// Events
// =============================================================================

/// The target event has a support collaborator.
pub fn event_has_support(ctx: &Context<'_>) -> bool {
    ctx.pk
        .and_then(|pk| ctx.perm_service.event_support(pk))
        .is_some()
}

/// The caller supports the target event.
pub fn is_event_associated_support(ctx: &Context<'_>) -> bool {
    ctx.pk.and_then(|pk| ctx.perm_service.event_support(pk)) == Some(ctx.auth.collaborator_id)
}

/// The caller is the salesman behind the target event.
pub fn is_event_associated_salesman(ctx: &Context<'_>) -> bool {
    ctx.pk.and_then(|pk| ctx.perm_service.event_salesman(pk)) == Some(ctx.auth.collaborator_id)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::permissions::PermissionQueries;
    use crm_core::RecordId;
    use serde_json::Value;

    /// Client 1 → salesman 2; contract 1 (signed) → client 1; event 1 → contract 1, support 3.
    struct OneOfEach;

    impl PermissionQueries for OneOfEach {
        fn client_salesman(&self, id: RecordId) -> Option<RecordId> {
            (id == 1).then_some(2)
        }
        fn contract_salesman(&self, id: RecordId) -> Option<RecordId> {
            (id == 1).then_some(2)
        }
        fn contract_signed(&self, id: RecordId) -> Option<bool> {
            (id == 1).then_some(true)
        }
        fn event_support(&self, id: RecordId) -> Option<RecordId> {
            (id == 1).then_some(3)
        }
        fn event_salesman(&self, id: RecordId) -> Option<RecordId> {
            (id == 1).then_some(2)
        }
    }

    fn eval(check: fn(&Context<'_>) -> bool, auth: &Identity, pk: Option<RecordId>) -> bool {
        check(&Context::new(auth, pk, Value::Null, &OneOfEach))
    }

    #[test]
    fn test_role_checks() {
        let sales = Identity::new("bob", 2, Role::Sales, "B");
        assert!(eval(is_sales, &sales, None));
        assert!(!eval(is_management, &sales, None));
        assert!(!eval(is_support, &sales, None));
    }

    #[test]
    fn test_is_self() {
        let sales = Identity::new("bob", 2, Role::Sales, "B");
        assert!(eval(is_self, &sales, Some(2)));
        assert!(!eval(is_self, &sales, Some(3)));
        assert!(!eval(is_self, &sales, None));
    }

    #[test]
    fn test_ownership_checks() {
        let sales = Identity::new("bob", 2, Role::Sales, "B");
        let support = Identity::new("sue", 3, Role::Support, "S");

        assert!(eval(is_client_associated_salesman, &sales, Some(1)));
        assert!(eval(is_contract_associated_salesman, &sales, Some(1)));
        assert!(eval(is_event_associated_salesman, &sales, Some(1)));
        assert!(eval(is_event_associated_support, &support, Some(1)));
        assert!(!eval(is_event_associated_support, &sales, Some(1)));
        assert!(eval(contract_is_signed, &sales, Some(1)));
    }

    #[test]
    fn test_missing_rows_are_false() {
        let sales = Identity::new("bob", 2, Role::Sales, "B");
        for check in [
            client_has_salesman,
            is_client_associated_salesman,
            contract_has_salesman,
            is_contract_associated_salesman,
            contract_is_signed,
            event_has_support,
            is_event_associated_support,
            is_event_associated_salesman,
        ] {
            assert!(!eval(check, &sales, Some(99)));
            assert!(!eval(check, &sales, None));
        }
    }
}
