// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! A [`TestEnv`] owns a temporary directory holding the token file and the
//! database, a [`ManualClock`] starting at [`START`], and the services wired
//! on top of them.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use crm_auth::{Identity, ManualClock, SessionConfig, SessionManager, StoredTokens};
use crm_core::{Database, RecordId, Role};
use crm_service::{NewCollaborator, Services};

// =============================================================================
// Constants
// =============================================================================

/// Signing secret.
pub const SECRET: &str = "k";
/// Access token lifetime in seconds.
pub const ACCESS_LIFETIME: i64 = 30;
/// Refresh token lifetime in seconds.
pub const REFRESH_LIFETIME: i64 = 300;
/// Initial clock value.
pub const START: i64 = 1000;
/// Password of every seeded collaborator.
pub const PASSWORD: &str = "correct horse";

// =============================================================================
// Identities
// =============================================================================

/// `{sub: "alice", c_id: 7, role: 3, name: "A L"}`
pub fn alice() -> Identity {
    Identity::new("alice", 7, Role::Management, "A L")
}

/// A salesman with the given collaborator id.
pub fn salesman(collaborator_id: RecordId) -> Identity {
    Identity::new(format!("sales{}", collaborator_id), collaborator_id, Role::Sales, "S T")
}

// =============================================================================
// TestEnv
// =============================================================================

/// An isolated session and database.
pub struct TestEnv {
    /// Holds the token file and the database file.
    pub dir: TempDir,
    /// The clock used by the session.
    pub clock: Arc<ManualClock>,
    /// The session manager.
    pub session: Arc<SessionManager>,
    /// The database.
    pub db: Arc<Database>,
    /// Services wired on `session` and `db`.
    pub services: Services,
}

impl TestEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        let dir = crate::common::temp_test_dir("crm_test");
        let clock = Arc::new(ManualClock::new(START));
        let config = SessionConfig::new(SECRET, dir.path().join("tokens.json"))
            .with_access_lifetime(ACCESS_LIFETIME)
            .with_refresh_lifetime(REFRESH_LIFETIME);
        let session = Arc::new(
            SessionManager::with_clock(config, clock.clone()).expect("session manager"),
        );
        let db = Arc::new(Database::open(dir.path().join("crm.json")).expect("database"));
        let services = Services::new(db.clone(), session.clone());

        Self {
            dir,
            clock,
            session,
            db,
            services,
        }
    }

    /// Path of the token file.
    pub fn token_path(&self) -> PathBuf {
        self.dir.path().join("tokens.json")
    }

    /// Path of the database file.
    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("crm.json")
    }

    /// Current content of the token file.
    pub fn stored(&self) -> Option<StoredTokens> {
        self.session.store().read()
    }

    /// Rewrites the token file through `edit`.
    pub fn edit_token_file(&self, edit: impl FnOnce(&mut Value)) {
        let raw = std::fs::read_to_string(self.token_path()).expect("token file");
        let mut value: Value = serde_json::from_str(&raw).expect("token json");
        edit(&mut value);
        std::fs::write(self.token_path(), value.to_string()).expect("write token file");
    }

    /// Logs in as `username` with [`PASSWORD`].
    pub fn login(&self, username: &str) -> Identity {
        self.services
            .users
            .login(username, PASSWORD)
            .unwrap_or_else(|e| panic!("login as {} failed: {}", username, e))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Seeded Staff
// =============================================================================

/// Ids of the seeded collaborators.
#[derive(Debug, Clone, Copy)]
pub struct Staff {
    /// Management, created by `init`.
    pub mia: RecordId,
    /// Sales.
    pub sam: RecordId,
    /// Sales.
    pub sue: RecordId,
    /// Support.
    pub sid: RecordId,
}

/// A collaborator to create with [`PASSWORD`].
pub fn new_collaborator(username: &str, role: Role) -> NewCollaborator {
    NewCollaborator {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        first_name: username.to_string(),
        last_name: "Test".to_string(),
        email: format!("{}@epic.events", username),
        role,
    }
}

/// Initialises the database with mia, then lets mia create the rest. Ends logged out.
pub fn seed_staff(env: &TestEnv) -> Staff {
    let mia = env
        .services
        .init(new_collaborator("mia", Role::Management))
        .expect("init")
        .id;
    env.login("mia");

    let collaborators = &env.services.collaborators;
    let create = |name: &str, role: Role| {
        collaborators
            .create(new_collaborator(name, role))
            .expect("create collaborator")
            .id
    };
    let staff = Staff {
        mia,
        sam: create("sam", Role::Sales),
        sue: create("sue", Role::Sales),
        sid: create("sid", Role::Support),
    };

    env.services.users.logout().expect("logout");
    staff
}

// =============================================================================
// Token Mutation
// =============================================================================

/// Replaces the character at `index` with a different base64url character.
pub fn flip_char(token: &str, index: usize) -> String {
    token
        .char_indices()
        .map(|(i, c)| {
            if i != index {
                c
            } else if c == 'A' {
                'B'
            } else {
                'A'
            }
        })
        .collect()
}
