// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # CRM Integration Tests
//!
//! Cross-crate tests of the session, the guard and the services, plus the
//! helpers they share.
//!
//! ## Module Structure
//!
//! - [`common`]: shared test utilities
//!   - `fixtures`: a temporary session with a manual clock, seeded staff
//!   - `mocks`: stub permission lookups and identity providers that count calls
//!   - `assertions`: denial assertions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p crm-tests
//! cargo test -p crm-tests --test integration_session
//! cargo test -p crm-tests --test integration_guard
//! cargo test -p crm-tests --test integration_services
//! cargo test -p crm-tests --test integration_config
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use crm_tests::prelude::*;
//!
//! #[test]
//! fn test_something() {
//!     let env = TestEnv::new();
//!     env.session.issue(&alice()).unwrap();
//!     env.clock.advance(40);
//!     assert_eq!(env.session.verify().unwrap().iat, 1040);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
