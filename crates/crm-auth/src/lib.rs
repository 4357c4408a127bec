// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # crm-auth
//!
//! Authentication and authorization for the CRM.
//!
//! ## Sessions
//!
//! The CLI has no server, so the session lives in a local file holding an
//! HS256 access token and a refresh token. [`SessionManager`] issues the pair
//! at login, verifies it on every call and renews an expired access token
//! from the refresh token.
//!
//! ## Guard
//!
//! Every business operation runs through [`Guard::call`]:
//!
//! ```text
//! current identity → RBAC (any tag) → ABAC (predicate) → operation
//! ```
//!
//! ```no_run
//! use std::sync::Arc;
//! use crm_auth::checks::{is_management, is_self};
//! use crm_auth::{predicate, Guard, Rule, SessionConfig, SessionManager};
//! use crm_core::Database;
//!
//! # fn main() -> crm_core::CrmResult<()> {
//! let session = SessionManager::new(SessionConfig::new("secret", ".crm/tokens.json"))?;
//! let guard = Guard::new(Arc::new(session), Arc::new(Database::in_memory()));
//!
//! let rule = Rule::new(["collaborator:modify_role"])
//!     .abac(predicate!(is_management) & !predicate!(is_self));
//! let target: crm_core::RecordId = 4;
//! guard.call(&rule, target, |inv| {
//!     println!("{} may change the role of {}", inv.identity()?.subject, inv.args);
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod checks;
pub mod claims;
pub mod clock;
pub mod config;
pub mod context;
pub mod guard;
pub mod identity;
pub mod password;
pub mod permissions;
pub mod predicate;
pub mod rbac;
pub mod session;
pub mod storage;
pub mod token;

pub use claims::{AccessClaims, Expiring, RefreshClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use context::Context;
pub use guard::{Guard, GuardedArgs, Invocation, Keyed, Rule};
pub use identity::{FixedIdentity, Identity, IdentityProvider};
pub use password::{hash_password, verify_password};
pub use permissions::{PermissionQueries, PermissionService, QuerySource};
pub use predicate::Predicate;
pub use rbac::{PermissionCatalogue, PermissionSet, STANDARD_CATALOGUE};
pub use session::SessionManager;
pub use storage::{StoredTokens, TokenStore};
pub use token::TokenCodec;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
