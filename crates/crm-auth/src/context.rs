// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Call context for attribute checks.

use serde_json::Value;

use crm_core::RecordId;

use crate::identity::Identity;
use crate::permissions::PermissionQueries;

/// What a predicate can see about a guarded call.
///
/// Built by the guard, discarded once the predicate has been evaluated.
pub struct Context<'a> {
    /// The caller.
    pub auth: &'a Identity,
    /// Primary key of the target record, when the operation has one.
    pub pk: Option<RecordId>,
    /// Operation arguments as a JSON value.
    pub args: Value,
    /// Lookups bound to a fresh read scope.
    pub perm_service: &'a dyn PermissionQueries,
}

impl<'a> Context<'a> {
    /// Creates a context.
    pub fn new(
        auth: &'a Identity,
        pk: Option<RecordId>,
        args: Value,
        perm_service: &'a dyn PermissionQueries,
    ) -> Self {
        Self {
            auth,
            pk,
            args,
            perm_service,
        }
    }

    /// Returns a named argument.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("auth", &self.auth.subject)
            .field("pk", &self.pk)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
