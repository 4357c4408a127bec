// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # crm-core
//!
//! Core types shared by every CRM crate.
//!
//! - [`CrmError`]: the single error base, classified by level and threat
//! - [`Role`]: staff roles with stable integer codes
//! - [`model`]: collaborators, clients, contracts and events
//! - [`Database`]: the local JSON-backed store with read and write scopes

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod model;
pub mod role;
pub mod store;

pub use error::{CrmError, CrmResult, Denial, Level, Threat, TokenFault};
pub use model::{Client, Collaborator, Contract, Event, RecordId};
pub use role::Role;
pub use store::{Database, ReadScope, Tables, WriteScope};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
