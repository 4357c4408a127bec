// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! First-run setup.

use tracing::info;

use crm_core::{Collaborator, CrmError, CrmResult, Database, Role};

use crate::collaborator::NewCollaborator;

/// Creates the first collaborator of an empty database, always as management.
///
/// Unguarded: nobody can log in before this runs. Fails once any collaborator exists.
pub fn init(db: &Database, first: NewCollaborator) -> CrmResult<Collaborator> {
    let record = NewCollaborator {
        role: Role::Management,
        ..first
    }
    .into_record()?;

    let mut scope = db.write();
    if scope.collaborators().next().is_some() {
        return Err(CrmError::validation(
            "database",
            "already initialised, log in as management to add collaborators",
        ));
    }
    let id = scope.insert_collaborator(record)?;
    let created = scope.require_collaborator(id)?.clone();
    scope.commit()?;

    info!(collaborator = id, username = %created.username, "Database initialised");
    Ok(created)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn first(role: Role) -> NewCollaborator {
        NewCollaborator {
            username: "root".to_string(),
            password: "correct horse".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            email: "ada@epic.events".to_string(),
            role,
        }
    }

    #[test]
    fn test_init_forces_management() {
        let db = Database::in_memory();
        let created = init(&db, first(Role::Sales)).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.role, Role::Management);
    }

    #[test]
    fn test_init_only_once() {
        let db = Database::in_memory();
        init(&db, first(Role::Management)).unwrap();

        let mut again = first(Role::Management);
        again.username = "second".to_string();
        assert!(matches!(init(&db, again), Err(CrmError::Validation { .. })));
        assert_eq!(db.read().collaborators().count(), 1);
    }

    #[test]
    fn test_init_rejects_short_password() {
        let db = Database::in_memory();
        let mut weak = first(Role::Management);
        weak.password = "short".to_string();
        assert!(init(&db, weak).is_err());
        assert_eq!(db.read().collaborators().count(), 0);
    }
}
