// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # crm-bin
//!
//! The `crm` command line interface.
//!
//! ```text
//!   main.rs ─▶ cli.rs (clap) ─▶ logging.rs
//!                  │
//!                  ▼
//!             commands ─▶ crm-service ─▶ crm-auth guard ─▶ crm-core store
//!                  │
//!                  ▼
//!         output.rs (stdout) / error.rs (stderr, exit code)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # First run on an empty database
//! crm init --username root --first-name Ada --last-name Admin --email ada@epic.events
//!
//! # Open a session
//! crm login root
//!
//! # Work with records
//! crm client list
//! crm contract pay 3 250.0
//! crm event modify-support 7 4
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
