// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Stand-ins for the permission lookups and the identity gate, recording how
//! often the guard reached them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crm_auth::{Identity, IdentityProvider, PermissionQueries, QuerySource};
use crm_core::{CrmError, CrmResult, Denial, RecordId};

// =============================================================================
// StubQueries
// =============================================================================

/// Permission lookups answered from in-memory maps.
#[derive(Debug, Clone, Default)]
pub struct StubQueries {
    client_salesman: HashMap<RecordId, RecordId>,
    contract_salesman: HashMap<RecordId, RecordId>,
    contract_signed: HashMap<RecordId, bool>,
    event_support: HashMap<RecordId, RecordId>,
    event_salesman: HashMap<RecordId, RecordId>,
    scopes_opened: Arc<AtomicUsize>,
}

impl StubQueries {
    /// Creates stubs with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client owned by `salesman`.
    pub fn with_client(mut self, client: RecordId, salesman: RecordId) -> Self {
        self.client_salesman.insert(client, salesman);
        self
    }

    /// Adds a contract whose client is owned by `salesman`.
    pub fn with_contract(mut self, contract: RecordId, salesman: RecordId, signed: bool) -> Self {
        self.contract_salesman.insert(contract, salesman);
        self.contract_signed.insert(contract, signed);
        self
    }

    /// Adds an event.
    pub fn with_event(
        mut self,
        event: RecordId,
        support: Option<RecordId>,
        salesman: RecordId,
    ) -> Self {
        if let Some(support) = support {
            self.event_support.insert(event, support);
        }
        self.event_salesman.insert(event, salesman);
        self
    }

    /// Number of scopes the guard opened.
    pub fn scopes_opened(&self) -> usize {
        self.scopes_opened.load(Ordering::SeqCst)
    }
}

impl PermissionQueries for StubQueries {
    fn client_salesman(&self, client_id: RecordId) -> Option<RecordId> {
        self.client_salesman.get(&client_id).copied()
    }

    fn contract_salesman(&self, contract_id: RecordId) -> Option<RecordId> {
        self.contract_salesman.get(&contract_id).copied()
    }

    fn contract_signed(&self, contract_id: RecordId) -> Option<bool> {
        self.contract_signed.get(&contract_id).copied()
    }

    fn event_support(&self, event_id: RecordId) -> Option<RecordId> {
        self.event_support.get(&event_id).copied()
    }

    fn event_salesman(&self, event_id: RecordId) -> Option<RecordId> {
        self.event_salesman.get(&event_id).copied()
    }
}

impl QuerySource for StubQueries {
    fn open_scope(&self) -> CrmResult<Box<dyn PermissionQueries + '_>> {
        self.scopes_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.clone()))
    }
}

// =============================================================================
// CountingIdentity
// =============================================================================

/// An identity provider that counts calls and may refuse every session.
#[derive(Debug, Default)]
pub struct CountingIdentity {
    identity: Option<Identity>,
    calls: AtomicUsize,
}

impl CountingIdentity {
    /// Always yields `identity`.
    pub fn of(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with `Authentication invalid`.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of identity lookups.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for CountingIdentity {
    fn current_identity(&self) -> CrmResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identity
            .clone()
            .ok_or_else(|| CrmError::denied(Denial::SessionInvalid, "No access token found"))
    }
}
