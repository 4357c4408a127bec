// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The caller's own account: login, logout and self-service.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crm_auth::{hash_password, verify_password, Guard, GuardedArgs, Identity, SessionManager};
use crm_core::{Collaborator, CrmError, CrmResult, Database};

use crate::fields;
use crate::rules;

/// Arguments of `modify_password`. Passwords are never exposed to predicates.
#[derive(Serialize)]
struct PasswordChange {
    #[serde(skip_serializing)]
    current: String,
    #[serde(skip_serializing)]
    new: String,
}

impl GuardedArgs for PasswordChange {}

#[derive(Serialize)]
struct UsernameChange {
    username: String,
}

impl GuardedArgs for UsernameChange {}

// =============================================================================
// UserService
// =============================================================================

/// Account operations of the logged-in user.
#[derive(Debug, Clone)]
pub struct UserService {
    db: Arc<Database>,
    session: Arc<SessionManager>,
    guard: Guard,
}

impl UserService {
    /// Creates the service.
    pub fn new(db: Arc<Database>, session: Arc<SessionManager>, guard: Guard) -> Self {
        Self { db, session, guard }
    }

    /// Checks credentials and starts a session.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub fn login(&self, username: &str, password: &str) -> CrmResult<Identity> {
        let identity = {
            let tables = self.db.read();
            match tables.collaborator_by_username(username) {
                Some(c) if verify_password(password, &c.password_hash) => identity_of(c),
                _ => {
                    warn!(username, "Login refused");
                    return Err(CrmError::AuthenticationFailed);
                }
            }
        };

        self.session.issue(&identity)?;
        info!(subject = %identity.subject, role = %identity.role, "Logged in");
        Ok(identity)
    }

    /// Ends the session.
    pub fn logout(&self) -> CrmResult<()> {
        self.session.wipe()?;
        info!("Logged out");
        Ok(())
    }

    /// Returns the caller.
    pub fn whoami(&self) -> CrmResult<Identity> {
        self.guard.call(&rules::USER_WHOAMI, (), |inv| inv.identity().cloned())
    }

    /// Changes the caller's password after checking the current one.
    pub fn modify_password(&self, current: &str, new: &str) -> CrmResult<()> {
        let args = PasswordChange {
            current: current.to_string(),
            new: new.to_string(),
        };
        self.guard.call(&rules::USER_MODIFY_PASSWORD, args, |inv| {
            let me = inv.identity()?.collaborator_id;
            let mut scope = self.db.write();
            let collaborator = scope.collaborator_mut(me)?;
            if !verify_password(&inv.args.current, &collaborator.password_hash) {
                return Err(CrmError::AuthenticationFailed);
            }
            collaborator.password_hash = hash_password(&inv.args.new)?;
            scope.commit()?;
            info!(collaborator = me, "Password changed");
            Ok(())
        })
    }

    /// Renames the caller and reissues the session under the new name.
    ///
    /// The session is reissued before the rename is committed: a token file
    /// that cannot be written leaves the username unchanged.
    pub fn modify_username(&self, username: &str) -> CrmResult<Identity> {
        let args = UsernameChange {
            username: username.trim().to_string(),
        };
        self.guard.call(&rules::USER_MODIFY_USERNAME, args, |inv| {
            fields::username(&inv.args.username)?;
            let previous = inv.identity()?.clone();
            let me = previous.collaborator_id;

            let mut scope = self.db.write();
            scope.rename_collaborator(me, &inv.args.username)?;
            let identity = identity_of(scope.require_collaborator(me)?);

            self.session.issue(&identity)?;
            if let Err(err) = scope.commit() {
                warn!(collaborator = me, error = %err, "Rename not saved, restoring session");
                self.session.issue(&previous)?;
                return Err(err);
            }
            info!(collaborator = me, subject = %identity.subject, "Username changed");
            Ok(identity)
        })
    }

    /// Lists every account.
    pub fn list(&self) -> CrmResult<Vec<Collaborator>> {
        self.guard.call(&rules::USER_LIST, (), |_| {
            Ok(self.db.read().collaborators().cloned().collect())
        })
    }
}

/// Identity carried by tokens for a collaborator.
pub fn identity_of(collaborator: &Collaborator) -> Identity {
    Identity::new(
        collaborator.username.clone(),
        collaborator.id,
        collaborator.role,
        collaborator.display_name(),
    )
}

// =============================================================================
// Tests
// =============================================================================
