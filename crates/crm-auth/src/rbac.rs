// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-Based Access Control (RBAC).
//!
//! Roles map to sets of permission tags of the form
//! `<resource>:<action>[_<qualifier>]`. Tags are opaque: only equality matters.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crm_core::Role;

// =============================================================================
// Permission Groups
// =============================================================================

/// Tag groups the standard catalogue is built from.
pub mod groups {
    /// Every account, including deactivated ones.
    pub const BASE: &[&str] = &[
        "user:whoami",
        "user:modify_password_own",
        "user:modify_username_own",
    ];

    /// Every active staff member.
    pub const COLLABORATOR: &[&str] = &[
        "collaborator:read",
        "collaborator:update_self",
        "collaborator:delete_self",
        "client:read",
        "contract:read",
        "event:read",
    ];

    /// Management.
    pub const MANAGEMENT: &[&str] = &[
        "user:read",
        "collaborator:create",
        "collaborator:update_any",
        "collaborator:delete_any",
        "collaborator:modify_role",
        "client:update_unassigned",
        "client:delete_unassigned",
        "contract:create",
        "contract:delete_unassigned",
        "event:modify_support",
        "event:delete",
    ];

    /// Sales.
    pub const SALES: &[&str] = &[
        "client:create",
        "client:update_own",
        "client:delete_own",
        "contract:delete_own",
        "contract:sign_own",
        "contract:modify_total_own",
        "contract:pay_own",
        "event:create",
        "event:update_unassigned",
        "event:delete_unassigned",
    ];

    /// Support.
    pub const SUPPORT: &[&str] = &["event:update_own"];
}

/// The standard catalogue, built once per process.
pub static STANDARD_CATALOGUE: Lazy<PermissionCatalogue> = Lazy::new(PermissionCatalogue::standard);

// =============================================================================
// PermissionSet
// =============================================================================

/// A set of permission tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    tags: BTreeSet<String>,
}

impl PermissionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from the union of tag groups.
    pub fn union_of(groups: &[&[&str]]) -> Self {
        groups.iter().flat_map(|g| g.iter().copied()).collect()
    }

    /// Adds a tag.
    pub fn add(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Returns `true` if the set contains `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Returns `true` if the set contains any of `tags`.
    pub fn contains_any<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|t| self.tags.contains(t.as_ref()))
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Merges another set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.tags.extend(other.tags.iter().cloned());
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// PermissionCatalogue
// =============================================================================

/// Role name to permission set.
///
/// Immutable once built; share it behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct PermissionCatalogue {
    roles: Arc<HashMap<String, PermissionSet>>,
}

impl PermissionCatalogue {
    /// Builds the standard catalogue.
    pub fn standard() -> Self {
        use groups::*;

        Self::builder()
            .add_role(Role::Deactivated.as_str(), &[BASE])
            .add_role(Role::Admin.as_str(), &[BASE])
            .add_role(Role::Management.as_str(), &[BASE, COLLABORATOR, MANAGEMENT])
            .add_role(Role::Sales.as_str(), &[BASE, COLLABORATOR, SALES])
            .add_role(Role::Support.as_str(), &[BASE, COLLABORATOR, SUPPORT])
            .build()
    }

    /// Creates a builder.
    pub fn builder() -> PermissionCatalogueBuilder {
        PermissionCatalogueBuilder::new()
    }

    /// Returns the tags granted to a role name.
    pub fn permissions_for(&self, role: &str) -> Option<&PermissionSet> {
        self.roles.get(role)
    }

    /// Returns `true` if `role` holds any of `required`.
    pub fn allows<S: AsRef<str>>(&self, role: &str, required: &[S]) -> bool {
        self.permissions_for(role)
            .map(|perms| perms.contains_any(required))
            .unwrap_or(false)
    }

    /// Returns all role names.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }
}

impl Default for PermissionCatalogue {
    fn default() -> Self {
        STANDARD_CATALOGUE.clone()
    }
}

// =============================================================================
// PermissionCatalogueBuilder
// =============================================================================

/// Builder for permission catalogues.
#[derive(Debug, Default)]
pub struct PermissionCatalogueBuilder {
    roles: HashMap<String, PermissionSet>,
}

impl PermissionCatalogueBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a role to the union of `groups`.
    pub fn add_role(mut self, role: impl Into<String>, groups: &[&[&str]]) -> Self {
        self.roles.insert(role.into(), PermissionSet::union_of(groups));
        self
    }

    /// Adds tags to a role, creating it if needed.
    pub fn add_permissions(mut self, role: impl Into<String>, tags: &[&str]) -> Self {
        let entry = self.roles.entry(role.into()).or_default();
        for tag in tags {
            entry.add(*tag);
        }
        self
    }

    /// Builds the catalogue.
    pub fn build(self) -> PermissionCatalogue {
        PermissionCatalogue {
            roles: Arc::new(self.roles),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
