// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Staff management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crm_auth::{hash_password, Guard, GuardedArgs, Keyed};
use crm_core::{Collaborator, CrmResult, Database, RecordId, Role};

use crate::fields;
use crate::rules;

/// A collaborator to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollaborator {
    /// Login name.
    pub username: String,
    /// Initial password.
    #[serde(skip_serializing)]
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Role.
    pub role: Role,
}

impl NewCollaborator {
    pub(crate) fn into_record(self) -> CrmResult<Collaborator> {
        fields::username(&self.username)?;
        fields::non_empty("first_name", &self.first_name)?;
        fields::non_empty("last_name", &self.last_name)?;
        fields::email("email", &self.email)?;

        Ok(Collaborator {
            id: 0,
            password_hash: hash_password(&self.password)?,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
        })
    }
}

impl GuardedArgs for NewCollaborator {}

/// Profile fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorChanges {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl CollaboratorChanges {
    fn apply(self, collaborator: &mut Collaborator) -> CrmResult<()> {
        if let Some(first_name) = self.first_name {
            fields::non_empty("first_name", &first_name)?;
            collaborator.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            fields::non_empty("last_name", &last_name)?;
            collaborator.last_name = last_name;
        }
        if let Some(email) = self.email {
            fields::email("email", &email)?;
            collaborator.email = email;
        }
        Ok(())
    }
}

// =============================================================================
// CollaboratorService
// =============================================================================

/// Collaborator operations.
#[derive(Debug, Clone)]
pub struct CollaboratorService {
    db: Arc<Database>,
    guard: Guard,
}

impl CollaboratorService {
    /// Creates the service.
    pub fn new(db: Arc<Database>, guard: Guard) -> Self {
        Self { db, guard }
    }

    /// Lists collaborators.
    pub fn list(&self) -> CrmResult<Vec<Collaborator>> {
        self.guard.call(&rules::COLLABORATOR_READ, (), |_| {
            Ok(self.db.read().collaborators().cloned().collect())
        })
    }

    /// Returns one collaborator.
    pub fn get(&self, pk: RecordId) -> CrmResult<Collaborator> {
        self.guard.call(&rules::COLLABORATOR_READ, pk, |inv| {
            Ok(self.db.read().require_collaborator(inv.args)?.clone())
        })
    }

    /// Creates a collaborator.
    pub fn create(&self, new: NewCollaborator) -> CrmResult<Collaborator> {
        self.guard.call(&rules::COLLABORATOR_CREATE, new, |inv| {
            let record = inv.args.into_record()?;
            let mut scope = self.db.write();
            let id = scope.insert_collaborator(record)?;
            let created = scope.require_collaborator(id)?.clone();
            scope.commit()?;
            info!(collaborator = id, username = %created.username, role = %created.role, "Collaborator created");
            Ok(created)
        })
    }

    /// Updates a profile: one's own, or anyone's for management.
    pub fn update(&self, pk: RecordId, changes: CollaboratorChanges) -> CrmResult<Collaborator> {
        self.guard
            .call(&rules::COLLABORATOR_UPDATE, Keyed::new(pk, changes), |inv| {
                let mut scope = self.db.write();
                let collaborator = scope.collaborator_mut(inv.args.pk)?;
                inv.args.data.apply(collaborator)?;
                let updated = collaborator.clone();
                scope.commit()?;
                info!(collaborator = pk, "Collaborator updated");
                Ok(updated)
            })
    }

    /// Deletes a collaborator; their clients and events become unassigned.
    pub fn delete(&self, pk: RecordId) -> CrmResult<Collaborator> {
        self.guard.call(&rules::COLLABORATOR_DELETE, pk, |inv| {
            let mut scope = self.db.write();
            let removed = scope.remove_collaborator(inv.args)?;
            scope.commit()?;
            info!(collaborator = pk, "Collaborator deleted");
            Ok(removed)
        })
    }

    /// Changes someone else's role.
    pub fn modify_role(&self, pk: RecordId, role: Role) -> CrmResult<Collaborator> {
        self.guard
            .call(&rules::COLLABORATOR_MODIFY_ROLE, Keyed::new(pk, role), |inv| {
                let mut scope = self.db.write();
                let collaborator = scope.collaborator_mut(inv.args.pk)?;
                collaborator.role = inv.args.data;
                let updated = collaborator.clone();
                scope.commit()?;
                info!(collaborator = pk, role = %role, "Role changed");
                Ok(updated)
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
