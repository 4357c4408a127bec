// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # crm-service
//!
//! Business operations of the CRM, each wrapped by a [`crm_auth::Guard`].
//!
//! | Service | Records |
//! |---------|---------|
//! | [`UserService`] | the caller's own account |
//! | [`CollaboratorService`] | staff |
//! | [`ClientService`] | customers |
//! | [`ContractService`] | contracts and payments |
//! | [`EventService`] | events under signed contracts |
//!
//! Access rules live in [`rules`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod client;
pub mod collaborator;
pub mod contract;
pub mod event;
pub mod rules;
pub mod user;

mod fields;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crm_auth::{Guard, SessionConfig, SessionManager};
use crm_config::CrmConfig;
use crm_core::{CrmResult, Database};

pub use bootstrap::init;
pub use client::{ClientChanges, ClientService, NewClient};
pub use collaborator::{CollaboratorChanges, CollaboratorService, NewCollaborator};
pub use contract::{ContractService, NewContract};
pub use event::{EventChanges, EventService, NewEvent};
pub use user::{identity_of, UserService};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Services
// =============================================================================

/// Every service sharing one database and one session.
#[derive(Debug, Clone)]
pub struct Services {
    /// The caller's own account.
    pub users: UserService,
    /// Staff.
    pub collaborators: CollaboratorService,
    /// Customers.
    pub clients: ClientService,
    /// Contracts.
    pub contracts: ContractService,
    /// Events.
    pub events: EventService,
    db: Arc<Database>,
    session: Arc<SessionManager>,
}

impl Services {
    /// Wires the services; the session supplies identities and the database answers ABAC lookups.
    pub fn new(db: Arc<Database>, session: Arc<SessionManager>) -> Self {
        let guard = Guard::new(session.clone(), db.clone());
        Self::with_guard(db, session, guard)
    }

    /// Wires the services around an existing guard.
    pub fn with_guard(db: Arc<Database>, session: Arc<SessionManager>, guard: Guard) -> Self {
        Self {
            users: UserService::new(db.clone(), session.clone(), guard.clone()),
            collaborators: CollaboratorService::new(db.clone(), guard.clone()),
            clients: ClientService::new(db.clone(), guard.clone()),
            contracts: ContractService::new(db.clone(), guard.clone()),
            events: EventService::new(db.clone(), guard),
            db,
            session,
        }
    }

    /// Opens the database and session described by the configuration.
    pub fn from_config(config: &CrmConfig) -> CrmResult<Self> {
        let db = Database::open(&config.data_storage)?;
        let session = SessionManager::new(SessionConfig::from(config))?;
        Ok(Self::new(Arc::new(db), Arc::new(session)))
    }

    /// Creates the first management collaborator.
    pub fn init(&self, first: NewCollaborator) -> CrmResult<crm_core::Collaborator> {
        bootstrap::init(&self.db, first)
    }

    /// Returns the database.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    /// Returns the session manager.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }
}
