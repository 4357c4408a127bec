// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Relational lookups for attribute checks.

use crm_core::{CrmResult, Database, ReadScope, RecordId};

/// Read-only questions predicates ask about the target record.
///
/// Every method returns `None` when the row or one of its links is absent.
pub trait PermissionQueries {
    /// Salesman in charge of a client.
    fn client_salesman(&self, client_id: RecordId) -> Option<RecordId>;

    /// Salesman in charge of a contract's client.
    fn contract_salesman(&self, contract_id: RecordId) -> Option<RecordId>;

    /// Whether a contract is signed.
    fn contract_signed(&self, contract_id: RecordId) -> Option<bool>;

    /// Support collaborator of an event.
    fn event_support(&self, event_id: RecordId) -> Option<RecordId>;

    /// Salesman in charge of an event's contract's client.
    fn event_salesman(&self, event_id: RecordId) -> Option<RecordId>;
}

/// Opens a fresh query scope per guarded call.
pub trait QuerySource: Send + Sync {
    /// Opens a scope; it is dropped right after the predicate is evaluated.
    fn open_scope(&self) -> CrmResult<Box<dyn PermissionQueries + '_>>;
}

// =============================================================================
// PermissionService
// =============================================================================

/// [`PermissionQueries`] over a database read scope.
pub struct PermissionService<'a> {
    scope: ReadScope<'a>,
}

impl<'a> PermissionService<'a> {
    /// Wraps a read scope.
    pub fn new(scope: ReadScope<'a>) -> Self {
        Self { scope }
    }
}

impl PermissionQueries for PermissionService<'_> {
    fn client_salesman(&self, client_id: RecordId) -> Option<RecordId> {
        self.scope.client(client_id)?.salesman_id
    }

    fn contract_salesman(&self, contract_id: RecordId) -> Option<RecordId> {
        let contract = self.scope.contract(contract_id)?;
        self.client_salesman(contract.client_id)
    }

    fn contract_signed(&self, contract_id: RecordId) -> Option<bool> {
        self.scope.contract(contract_id).map(|c| c.signed)
    }

    fn event_support(&self, event_id: RecordId) -> Option<RecordId> {
        self.scope.event(event_id)?.support_id
    }

    fn event_salesman(&self, event_id: RecordId) -> Option<RecordId> {
        let event = self.scope.event(event_id)?;
        self.contract_salesman(event.contract_id)
    }
}

impl QuerySource for Database {
    fn open_scope(&self) -> CrmResult<Box<dyn PermissionQueries + '_>> {
        Ok(Box::new(PermissionService::new(self.read())))
    }
}

// =============================================================================
// Tests
// =============================================================================
