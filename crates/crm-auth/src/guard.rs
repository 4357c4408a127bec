// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The guard around every protected operation.
//!
//! A guarded call runs, in order:
//!
//! 1. identity: the current session must verify
//! 2. RBAC: the caller's role must hold one of the rule's tags
//! 3. ABAC: the rule's predicate must hold over a fresh [`Context`]
//! 4. the operation itself, with the identity injected unless disabled
//!
//! A failing step stops the call; nothing after it runs.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crm_core::{CrmError, CrmResult, Denial, RecordId};

use crate::context::Context;
use crate::identity::{Identity, IdentityProvider};
use crate::permissions::QuerySource;
use crate::predicate::Predicate;
use crate::rbac::PermissionCatalogue;

// =============================================================================
// Guarded arguments
// =============================================================================

/// Arguments of a guarded operation.
///
/// The serialized form is exposed to predicates as `Context::args`.
pub trait GuardedArgs: Serialize {
    /// Primary key of the target record.
    fn pk(&self) -> Option<RecordId> {
        None
    }
}

impl GuardedArgs for () {}

impl GuardedArgs for RecordId {
    fn pk(&self) -> Option<RecordId> {
        Some(*self)
    }
}

/// A target record plus the data of the call.
#[derive(Debug, Clone, Serialize)]
pub struct Keyed<T> {
    /// Target record.
    pub pk: RecordId,
    /// Call data.
    pub data: T,
}

impl<T> Keyed<T> {
    /// Creates keyed arguments.
    pub fn new(pk: RecordId, data: T) -> Self {
        Self { pk, data }
    }
}

impl<T: Serialize> GuardedArgs for Keyed<T> {
    fn pk(&self) -> Option<RecordId> {
        Some(self.pk)
    }
}

// =============================================================================
// Rule
// =============================================================================

/// Declares what a guarded operation requires.
#[derive(Debug, Clone)]
pub struct Rule {
    tags: Vec<String>,
    abac: Option<Predicate>,
    inject_identity: bool,
}

impl Rule {
    /// Requires any one of `tags`.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            abac: None,
            inject_identity: true,
        }
    }

    /// Adds an attribute predicate.
    pub fn abac(mut self, predicate: Predicate) -> Self {
        self.abac = Some(predicate);
        self
    }

    /// Stops the identity from being handed to the operation.
    pub fn without_identity(mut self) -> Self {
        self.inject_identity = false;
        self
    }

    /// Returns the required tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the attribute predicate.
    pub fn predicate(&self) -> Option<&Predicate> {
        self.abac.as_ref()
    }
}

// =============================================================================
// Invocation
// =============================================================================

/// What a guarded operation receives.
#[derive(Debug)]
pub struct Invocation<A> {
    /// Operation arguments.
    pub args: A,
    /// The caller, unless the rule disabled injection.
    pub auth: Option<Identity>,
}

impl<A> Invocation<A> {
    /// Returns the injected identity.
    pub fn identity(&self) -> CrmResult<&Identity> {
        self.auth
            .as_ref()
            .ok_or_else(|| CrmError::denied(Denial::SessionInvalid, "No identity was injected"))
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Enforces authentication, RBAC and ABAC around operations.
#[derive(Clone)]
pub struct Guard {
    identity: Arc<dyn IdentityProvider>,
    catalogue: PermissionCatalogue,
    queries: Arc<dyn QuerySource>,
}

impl Guard {
    /// Creates a guard using the standard catalogue.
    pub fn new(identity: Arc<dyn IdentityProvider>, queries: Arc<dyn QuerySource>) -> Self {
        Self {
            identity,
            catalogue: PermissionCatalogue::default(),
            queries,
        }
    }

    /// Replaces the permission catalogue.
    pub fn with_catalogue(mut self, catalogue: PermissionCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Returns the permission catalogue.
    pub fn catalogue(&self) -> &PermissionCatalogue {
        &self.catalogue
    }

    /// Runs the identity, RBAC and ABAC steps for `rule`.
    pub fn authorize<A: GuardedArgs>(&self, rule: &Rule, args: &A) -> CrmResult<Identity> {
        let identity = self.identity.current_identity()?;

        if !self.catalogue.allows(identity.role.as_str(), &rule.tags) {
            let denial = Denial::rbac(rule.tags.iter().cloned());
            let tips = format!("Required permissions: {}", rule.tags.join(", "));
            warn!(subject = %identity.subject, role = %identity.role, "{}", denial);
            return Err(CrmError::denied(denial, tips));
        }

        if let Some(predicate) = &rule.abac {
            let allowed = {
                let scope = self.queries.open_scope()?;
                let ctx = Context::new(&identity, args.pk(), serde_json::to_value(args)?, &*scope);
                predicate.evaluate(&ctx)
            };
            if !allowed {
                let denial = Denial::abac(predicate.label());
                warn!(subject = %identity.subject, pk = ?args.pk(), "{}", denial);
                return Err(CrmError::denied(
                    denial,
                    "You are not allowed to act on this record",
                ));
            }
        }

        debug!(subject = %identity.subject, tags = ?rule.tags, "Access granted");
        Ok(identity)
    }

    /// Authorizes, then invokes `op`.
    pub fn call<A, R, F>(&self, rule: &Rule, args: A, op: F) -> CrmResult<R>
    where
        A: GuardedArgs,
        F: FnOnce(Invocation<A>) -> CrmResult<R>,
    {
        let identity = self.authorize(rule, &args)?;
        let auth = rule.inject_identity.then_some(identity);
        op(Invocation { args, auth })
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("roles", &self.catalogue.roles())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
