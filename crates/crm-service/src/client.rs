// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client portfolio.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crm_auth::{Guard, GuardedArgs, Keyed};
use crm_core::{Client, CrmError, CrmResult, Database, RecordId};

use crate::fields;
use crate::rules;

/// A client to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    /// Contact name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Company name.
    pub company: String,
}

impl GuardedArgs for NewClient {}

/// Client fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientChanges {
    /// Contact name.
    pub full_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
}

impl ClientChanges {
    fn apply(self, client: &mut Client) -> CrmResult<()> {
        if let Some(full_name) = self.full_name {
            fields::non_empty("full_name", &full_name)?;
            client.full_name = full_name;
        }
        if let Some(email) = self.email {
            fields::email("email", &email)?;
            client.email = email;
        }
        if let Some(phone) = self.phone {
            client.phone = phone;
        }
        if let Some(company) = self.company {
            fields::non_empty("company", &company)?;
            client.company = company;
        }
        client.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// ClientService
// =============================================================================

/// Client operations.
#[derive(Debug, Clone)]
pub struct ClientService {
    db: Arc<Database>,
    guard: Guard,
}

impl ClientService {
    /// Creates the service.
    pub fn new(db: Arc<Database>, guard: Guard) -> Self {
        Self { db, guard }
    }

    /// Lists clients.
    pub fn list(&self) -> CrmResult<Vec<Client>> {
        self.guard.call(&rules::CLIENT_READ, (), |_| {
            Ok(self.db.read().clients().cloned().collect())
        })
    }

    /// Returns one client.
    pub fn get(&self, pk: RecordId) -> CrmResult<Client> {
        self.guard.call(&rules::CLIENT_READ, pk, |inv| {
            self.db
                .read()
                .client(inv.args)
                .cloned()
                .ok_or_else(|| CrmError::not_found("Client", inv.args))
        })
    }

    /// Creates a client owned by the calling salesman.
    pub fn create(&self, new: NewClient) -> CrmResult<Client> {
        self.guard.call(&rules::CLIENT_CREATE, new, |inv| {
            let salesman = inv.identity()?.collaborator_id;
            let NewClient {
                full_name,
                email,
                phone,
                company,
            } = inv.args;
            fields::non_empty("full_name", &full_name)?;
            fields::email("email", &email)?;
            fields::non_empty("company", &company)?;

            let now = Utc::now();
            let mut scope = self.db.write();
            let id = scope.insert_client(Client {
                id: 0,
                full_name,
                email,
                phone,
                company,
                salesman_id: Some(salesman),
                created_at: now,
                updated_at: now,
            })?;
            let created = scope.client_mut(id)?.clone();
            scope.commit()?;
            info!(client = id, salesman, "Client created");
            Ok(created)
        })
    }

    /// Updates a client the caller owns, or an unassigned one for management.
    pub fn update(&self, pk: RecordId, changes: ClientChanges) -> CrmResult<Client> {
        self.guard
            .call(&rules::CLIENT_UPDATE, Keyed::new(pk, changes), |inv| {
                let mut scope = self.db.write();
                let client = scope.client_mut(inv.args.pk)?;
                inv.args.data.apply(client)?;
                let updated = client.clone();
                scope.commit()?;
                info!(client = pk, "Client updated");
                Ok(updated)
            })
    }

    /// Deletes a client with its contracts and events.
    pub fn delete(&self, pk: RecordId) -> CrmResult<Client> {
        self.guard.call(&rules::CLIENT_DELETE, pk, |inv| {
            let mut scope = self.db.write();
            let removed = scope.remove_client(inv.args)?;
            scope.commit()?;
            info!(client = pk, "Client deleted");
            Ok(removed)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crm_core::Denial;

    fn service(as_id: RecordId) -> (Arc<Database>, ClientService) {
        let db = seeded();
        let guard = guard_as(&db, as_id);
        (db.clone(), ClientService::new(db, guard))
    }

    fn new_client() -> NewClient {
        NewClient {
            full_name: "Kim Lee".to_string(),
            email: "kim@corp.io".to_string(),
            phone: "0600000000".to_string(),
            company: "Corp".to_string(),
        }
    }

    #[test]
    fn test_create_assigns_caller() {
        let (_, clients) = service(SUE);
        let created = clients.create(new_client()).unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.salesman_id, Some(SUE));
    }

    #[test]
    fn test_create_requires_sales() {
        let (db, clients) = service(SID);
        let err = clients.create(new_client()).unwrap_err();
        assert_eq!(err.to_string(), "Permission error (RBAC) in {'client:create'}");
        assert_eq!(db.read().clients().count(), 2);
    }

    #[test]
    fn test_update_own_only() {
        let (_, clients) = service(SAM);
        let changes = ClientChanges {
            company: Some("Startup SAS".to_string()),
            ..Default::default()
        };
        assert_eq!(clients.update(CLIENT_SAM, changes.clone()).unwrap().company, "Startup SAS");

        let err = clients.update(CLIENT_FREE, changes).unwrap_err();
        assert!(matches!(err.denial(), Some(Denial::Abac { .. })));
    }

    #[test]
    fn test_management_updates_unassigned_only() {
        let (_, clients) = service(MIA);
        let changes = ClientChanges {
            phone: Some("0700000000".to_string()),
            ..Default::default()
        };
        assert!(clients.update(CLIENT_FREE, changes.clone()).is_ok());
        assert!(clients.update(CLIENT_SAM, changes).is_err());
    }

    #[test]
    fn test_invalid_change_is_discarded() {
        let (db, clients) = service(SAM);
        let changes = ClientChanges {
            full_name: Some("Kevin C".to_string()),
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(clients.update(CLIENT_SAM, changes), Err(CrmError::Validation { .. })));
        assert_eq!(db.read().client(CLIENT_SAM).unwrap().full_name, "Kevin Casey");
    }

    #[test]
    fn test_delete_cascades() {
        let (db, clients) = service(SAM);
        clients.delete(CLIENT_SAM).unwrap();
        let tables = db.read();
        assert_eq!(tables.contracts().count(), 0);
        assert_eq!(tables.events().count(), 0);
    }

    #[test]
    fn test_read_is_open_to_collaborators() {
        let (_, clients) = service(SID);
        assert_eq!(clients.list().unwrap().len(), 2);
        assert_eq!(clients.get(CLIENT_SAM).unwrap().full_name, "Kevin Casey");
        assert!(matches!(clients.get(99), Err(CrmError::NotFound { .. })));

        let (_, clients) = service(DAN);
        assert!(clients.list().is_err());
    }
}
