// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Local record store.
//!
//! All records live in a [`Tables`] snapshot held behind a lock and persisted
//! as one JSON file. Access goes through scopes:
//!
//! - [`ReadScope`]: shared, read-only view of the committed snapshot
//! - [`WriteScope`]: exclusive draft copy, applied only by [`WriteScope::commit`]
//!
//! Dropping a write scope without committing discards the draft.

use std::collections::BTreeMap;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CrmError, CrmResult};
use crate::model::{Client, Collaborator, Contract, Event, RecordId};

// =============================================================================
// Tables
// =============================================================================

/// Last identifier handed out per table. Identifiers are never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Sequences {
    collaborators: RecordId,
    clients: RecordId,
    contracts: RecordId,
    events: RecordId,
}

fn next(seq: &mut RecordId) -> RecordId {
    *seq += 1;
    *seq
}

/// Every record of the CRM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    collaborators: BTreeMap<RecordId, Collaborator>,
    clients: BTreeMap<RecordId, Client>,
    contracts: BTreeMap<RecordId, Contract>,
    events: BTreeMap<RecordId, Event>,
    sequences: Sequences,
}

impl Tables {
    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Returns a collaborator by id.
    pub fn collaborator(&self, id: RecordId) -> Option<&Collaborator> {
        self.collaborators.get(&id)
    }

    /// Returns a collaborator by username.
    pub fn collaborator_by_username(&self, username: &str) -> Option<&Collaborator> {
        self.collaborators.values().find(|c| c.username == username)
    }

    /// Returns all collaborators ordered by id.
    pub fn collaborators(&self) -> impl Iterator<Item = &Collaborator> {
        self.collaborators.values()
    }

    /// Inserts a collaborator, assigning its id.
    pub fn insert_collaborator(&mut self, mut collaborator: Collaborator) -> CrmResult<RecordId> {
        self.ensure_username_free(&collaborator.username, None)?;
        collaborator.id = next(&mut self.sequences.collaborators);
        let id = collaborator.id;
        self.collaborators.insert(id, collaborator);
        Ok(id)
    }

    /// Returns a mutable collaborator.
    pub fn collaborator_mut(&mut self, id: RecordId) -> CrmResult<&mut Collaborator> {
        self.collaborators
            .get_mut(&id)
            .ok_or_else(|| CrmError::not_found("Collaborator", id))
    }

    /// Renames a collaborator, keeping usernames unique.
    pub fn rename_collaborator(&mut self, id: RecordId, username: &str) -> CrmResult<()> {
        self.ensure_username_free(username, Some(id))?;
        self.collaborator_mut(id)?.username = username.to_string();
        Ok(())
    }

    /// Removes a collaborator; their clients and events become unassigned.
    pub fn remove_collaborator(&mut self, id: RecordId) -> CrmResult<Collaborator> {
        let removed = self
            .collaborators
            .remove(&id)
            .ok_or_else(|| CrmError::not_found("Collaborator", id))?;
        for client in self.clients.values_mut() {
            if client.salesman_id == Some(id) {
                client.salesman_id = None;
            }
        }
        for event in self.events.values_mut() {
            if event.support_id == Some(id) {
                event.support_id = None;
            }
        }
        Ok(removed)
    }

    fn ensure_username_free(&self, username: &str, owner: Option<RecordId>) -> CrmResult<()> {
        match self.collaborator_by_username(username) {
            Some(existing) if Some(existing.id) != owner => Err(CrmError::validation(
                "username",
                format!("'{}' is already taken", username),
            )),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// Returns a client by id.
    pub fn client(&self, id: RecordId) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Returns all clients ordered by id.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Inserts a client, assigning its id.
    pub fn insert_client(&mut self, mut client: Client) -> CrmResult<RecordId> {
        if let Some(salesman) = client.salesman_id {
            self.require_collaborator(salesman)?;
        }
        client.id = next(&mut self.sequences.clients);
        let id = client.id;
        self.clients.insert(id, client);
        Ok(id)
    }

    /// Returns a mutable client.
    pub fn client_mut(&mut self, id: RecordId) -> CrmResult<&mut Client> {
        self.clients
            .get_mut(&id)
            .ok_or_else(|| CrmError::not_found("Client", id))
    }

    /// Removes a client together with its contracts and their events.
    pub fn remove_client(&mut self, id: RecordId) -> CrmResult<Client> {
        let removed = self
            .clients
            .remove(&id)
            .ok_or_else(|| CrmError::not_found("Client", id))?;
        let contract_ids: Vec<RecordId> = self
            .contracts
            .values()
            .filter(|c| c.client_id == id)
            .map(|c| c.id)
            .collect();
        for contract_id in contract_ids {
            self.remove_contract(contract_id)?;
        }
        Ok(removed)
    }

    // =========================================================================
    // Contracts
    // =========================================================================

    /// Returns a contract by id.
    pub fn contract(&self, id: RecordId) -> Option<&Contract> {
        self.contracts.get(&id)
    }

    /// Returns all contracts ordered by id.
    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    /// Inserts a contract, assigning its id.
    pub fn insert_contract(&mut self, mut contract: Contract) -> CrmResult<RecordId> {
        if self.client(contract.client_id).is_none() {
            return Err(CrmError::not_found("Client", contract.client_id));
        }
        contract.validate()?;
        contract.id = next(&mut self.sequences.contracts);
        let id = contract.id;
        self.contracts.insert(id, contract);
        Ok(id)
    }

    /// Returns a mutable contract.
    pub fn contract_mut(&mut self, id: RecordId) -> CrmResult<&mut Contract> {
        self.contracts
            .get_mut(&id)
            .ok_or_else(|| CrmError::not_found("Contract", id))
    }

    /// Removes a contract together with its events.
    pub fn remove_contract(&mut self, id: RecordId) -> CrmResult<Contract> {
        let removed = self
            .contracts
            .remove(&id)
            .ok_or_else(|| CrmError::not_found("Contract", id))?;
        self.events.retain(|_, event| event.contract_id != id);
        Ok(removed)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Returns an event by id.
    pub fn event(&self, id: RecordId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// Returns all events ordered by id.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Inserts an event, assigning its id.
    pub fn insert_event(&mut self, mut event: Event) -> CrmResult<RecordId> {
        if self.contract(event.contract_id).is_none() {
            return Err(CrmError::not_found("Contract", event.contract_id));
        }
        if let Some(support) = event.support_id {
            self.require_collaborator(support)?;
        }
        event.validate()?;
        event.id = next(&mut self.sequences.events);
        let id = event.id;
        self.events.insert(id, event);
        Ok(id)
    }

    /// Returns a mutable event.
    pub fn event_mut(&mut self, id: RecordId) -> CrmResult<&mut Event> {
        self.events
            .get_mut(&id)
            .ok_or_else(|| CrmError::not_found("Event", id))
    }

    /// Removes an event.
    pub fn remove_event(&mut self, id: RecordId) -> CrmResult<Event> {
        self.events
            .remove(&id)
            .ok_or_else(|| CrmError::not_found("Event", id))
    }

    /// Fails unless the collaborator exists.
    pub fn require_collaborator(&self, id: RecordId) -> CrmResult<&Collaborator> {
        self.collaborator(id)
            .ok_or_else(|| CrmError::not_found("Collaborator", id))
    }
}

// =============================================================================
// Database
// =============================================================================

/// The CRM record store.
#[derive(Debug)]
pub struct Database {
    tables: RwLock<Tables>,
    path: Option<PathBuf>,
}

impl Database {
    /// Creates an empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            path: None,
        }
    }

    /// Opens the store persisted at `path`, starting empty if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> CrmResult<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| CrmError::storage(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| CrmError::storage(format!("{}: {}", path.display(), e)))?
        } else {
            debug!(path = %path.display(), "Database file absent, starting empty");
            Tables::default()
        };

        Ok(Self {
            tables: RwLock::new(tables),
            path: Some(path),
        })
    }

    /// Returns the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Opens a read scope.
    pub fn read(&self) -> ReadScope<'_> {
        ReadScope {
            guard: self.tables.read(),
        }
    }

    /// Opens a write scope on a draft copy of the tables.
    pub fn write(&self) -> WriteScope<'_> {
        let guard = self.tables.write();
        let draft = guard.clone();
        WriteScope {
            guard,
            draft,
            path: self.path.as_deref(),
        }
    }
}

/// Shared read-only view of the committed tables.
pub struct ReadScope<'a> {
    guard: RwLockReadGuard<'a, Tables>,
}

impl Deref for ReadScope<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.guard
    }
}

/// Exclusive draft of the tables.
pub struct WriteScope<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    draft: Tables,
    path: Option<&'a Path>,
}

impl WriteScope<'_> {
    /// Persists the draft and makes it the committed state.
    pub fn commit(self) -> CrmResult<()> {
        let WriteScope {
            mut guard,
            draft,
            path,
        } = self;

        if let Some(path) = path {
            persist(path, &draft)?;
        }
        *guard = draft;
        Ok(())
    }
}

impl Deref for WriteScope<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.draft
    }
}

impl DerefMut for WriteScope<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.draft
    }
}

/// Writes the snapshot next to its destination, then renames it into place.
fn persist(path: &Path, tables: &Tables) -> CrmResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(tables)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, content)?;
    fs::rename(&staging, path)?;
    info!(path = %path.display(), "Database saved");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use chrono::Utc;

    fn collaborator(username: &str, role: Role) -> Collaborator {
        Collaborator {
            id: 0,
            username: username.to_string(),
            password_hash: String::new(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            email: format!("{}@example.com", username),
            role,
        }
    }

    fn client(salesman_id: Option<RecordId>) -> Client {
        Client {
            id: 0,
            full_name: "Kevin Casey".to_string(),
            email: "kevin@startup.io".to_string(),
            phone: "+678 123 456 78".to_string(),
            company: "Cool Startup LLC".to_string(),
            salesman_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contract(client_id: RecordId) -> Contract {
        Contract {
            id: 0,
            client_id,
            total_amount: 1000.0,
            remaining_amount: 1000.0,
            signed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_commit_applies_draft() {
        let db = Database::in_memory();
        let mut scope = db.write();
        let id = scope.insert_collaborator(collaborator("alice", Role::Sales)).unwrap();
        scope.commit().unwrap();

        assert_eq!(id, 1);
        assert_eq!(db.read().collaborator(1).unwrap().username, "alice");
    }

    #[test]
    fn test_dropped_scope_discards_draft() {
        let db = Database::in_memory();
        {
            let mut scope = db.write();
            scope.insert_collaborator(collaborator("alice", Role::Sales)).unwrap();
        }
        assert!(db.read().collaborator(1).is_none());
    }

    #[test]
    fn test_usernames_are_unique() {
        let db = Database::in_memory();
        let mut scope = db.write();
        scope.insert_collaborator(collaborator("alice", Role::Sales)).unwrap();
        let err = scope
            .insert_collaborator(collaborator("alice", Role::Support))
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation { .. }));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let db = Database::in_memory();
        let mut scope = db.write();
        let first = scope.insert_collaborator(collaborator("a", Role::Sales)).unwrap();
        scope.remove_collaborator(first).unwrap();
        let second = scope.insert_collaborator(collaborator("b", Role::Sales)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_removing_salesman_unassigns_clients() {
        let db = Database::in_memory();
        let mut scope = db.write();
        let salesman = scope.insert_collaborator(collaborator("bob", Role::Sales)).unwrap();
        let client_id = scope.insert_client(client(Some(salesman))).unwrap();
        scope.remove_collaborator(salesman).unwrap();
        assert_eq!(scope.client(client_id).unwrap().salesman_id, None);
    }

    #[test]
    fn test_removing_client_cascades() {
        let db = Database::in_memory();
        let mut scope = db.write();
        let client_id = scope.insert_client(client(None)).unwrap();
        let contract_id = scope.insert_contract(contract(client_id)).unwrap();
        scope.remove_client(client_id).unwrap();
        assert!(scope.contract(contract_id).is_none());
    }

    #[test]
    fn test_contract_requires_client() {
        let db = Database::in_memory();
        let mut scope = db.write();
        let err = scope.insert_contract(contract(42)).unwrap_err();
        assert!(matches!(err, CrmError::NotFound { entity: "Client", .. }));
    }

    #[test]
    fn test_persisted_database_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("crm.json");

        let db = Database::open(&path).unwrap();
        let mut scope = db.write();
        scope.insert_collaborator(collaborator("alice", Role::Management)).unwrap();
        scope.commit().unwrap();
        drop(db);

        let reopened = Database::open(&path).unwrap();
        let alice = reopened.read().collaborator_by_username("alice").cloned().unwrap();
        assert_eq!(alice.role, Role::Management);
    }
}
