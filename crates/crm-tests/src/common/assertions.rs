// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertions on the outcome of guarded calls.

use std::fmt::Debug;

use crm_core::{CrmError, CrmResult, Denial, TokenFault};

/// Assertion extensions for results of guarded calls.
pub trait DenialAssertions {
    /// Assert an RBAC denial listing exactly `tags`.
    fn assert_rbac_denied(&self, tags: &[&str]);

    /// Assert an ABAC denial for the predicate `label`.
    fn assert_abac_denied(&self, label: &str);

    /// Assert a lost session.
    fn assert_session_invalid(&self);

    /// Assert a `BadToken` error with `fault`.
    fn assert_bad_token(&self, fault: TokenFault);
}

impl<T: Debug> DenialAssertions for CrmResult<T> {
    fn assert_rbac_denied(&self, tags: &[&str]) {
        match self {
            Err(err) => assert_eq!(
                err.denial(),
                Some(&Denial::rbac(tags.iter().copied())),
                "Expected RBAC denial for {:?}, got {}",
                tags,
                err
            ),
            Ok(v) => panic!("Expected RBAC denial for {:?}, got Ok({:?})", tags, v),
        }
    }

    fn assert_abac_denied(&self, label: &str) {
        match self {
            Err(err) => assert_eq!(
                err.denial(),
                Some(&Denial::abac(label)),
                "Expected ABAC denial for {}, got {}",
                label,
                err
            ),
            Ok(v) => panic!("Expected ABAC denial for {}, got Ok({:?})", label, v),
        }
    }

    fn assert_session_invalid(&self) {
        match self {
            Err(err) => assert_eq!(
                err.denial(),
                Some(&Denial::SessionInvalid),
                "Expected a lost session, got {}",
                err
            ),
            Ok(v) => panic!("Expected a lost session, got Ok({:?})", v),
        }
    }

    fn assert_bad_token(&self, fault: TokenFault) {
        match self {
            Err(CrmError::BadToken { fault: actual }) => assert_eq!(*actual, fault),
            other => panic!("Expected BadToken({:?}), got {:?}", fault, other),
        }
    }
}
