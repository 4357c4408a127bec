// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Composable attribute predicates.
//!
//! A [`Predicate`] is a labelled function over a [`Context`]. Predicates
//! combine with `&`, `|` and `!`, and the label follows the structure:
//!
//! | Expression | Label |
//! |------------|-------|
//! | `a & b`    | `(a and b)` |
//! | `a \| b`   | `(a or b)` |
//! | `!a`       | `not a` |
//!
//! Labels appear verbatim in denial messages.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use crate::context::Context;

type Check = dyn Fn(&Context<'_>) -> bool + Send + Sync;

/// Lifts a named check function into a [`Predicate`] labelled by its name.
///
/// ```
/// use crm_auth::checks::{is_management, is_self};
/// use crm_auth::predicate;
///
/// let rule = predicate!(is_management) & !predicate!(is_self);
/// assert_eq!(rule.label(), "(is_management and not is_self)");
/// ```
#[macro_export]
macro_rules! predicate {
    ($check:ident) => {
        $crate::predicate::Predicate::new(stringify!($check), $check)
    };
}

// =============================================================================
// Predicate
// =============================================================================

/// A labelled boolean function over a call context.
#[derive(Clone)]
pub struct Predicate {
    label: Arc<str>,
    check: Arc<Check>,
}

impl Predicate {
    /// Creates a predicate.
    pub fn new<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label.into()),
            check: Arc::new(check),
        }
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the predicate.
    pub fn evaluate(&self, ctx: &Context<'_>) -> bool {
        (self.check)(ctx)
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        let label = format!("({} and {})", self.label, rhs.label);
        Predicate::new(label, move |ctx| self.evaluate(ctx) && rhs.evaluate(ctx))
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        let label = format!("({} or {})", self.label, rhs.label);
        Predicate::new(label, move |ctx| self.evaluate(ctx) || rhs.evaluate(ctx))
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        let label = format!("not {}", self.label);
        Predicate::new(label, move |ctx| !self.evaluate(ctx))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

// =============================================================================
// Tests
// =============================================================================
