// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # crm-config
//!
//! Configuration management for the CRM.
//!
//! ## Loading Pipeline
//!
//! 1. Parse the TOML (or JSON) file, if present
//! 2. Apply environment overrides (`SECRET_KEY`, `TOKEN_STORAGE`, ...)
//! 3. Resolve relative paths against the config file directory
//! 4. Validate
//!
//! ```no_run
//! use crm_config::load_config;
//!
//! let config = load_config("crm.toml").unwrap();
//! println!("Tokens stored in {}", config.token_storage.display());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigFormat, ConfigLoader};
pub use schema::CrmConfig;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
