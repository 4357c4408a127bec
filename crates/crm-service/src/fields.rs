// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Field checks shared by the services.

use crm_core::{CrmError, CrmResult};

pub(crate) fn non_empty(field: &str, value: &str) -> CrmResult<()> {
    if value.trim().is_empty() {
        return Err(CrmError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn email(field: &str, value: &str) -> CrmResult<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(CrmError::validation(field, format!("'{}' is not an email address", value)));
    }
    Ok(())
}

pub(crate) fn username(value: &str) -> CrmResult<()> {
    non_empty("username", value)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(CrmError::validation(
            "username",
            "may only contain letters, digits, '_', '-' and '.'",
        ));
    }
    Ok(())
}

pub(crate) fn amount(field: &str, value: f64) -> CrmResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CrmError::validation(field, "must be a non-negative amount"));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(email("email", "kevin@startup.io").is_ok());
        for bad in ["", "kevin", "@startup.io", "kevin@startup", "kevin@.io"] {
            assert!(email("email", bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_username() {
        assert!(username("alice.l").is_ok());
        assert!(username("alice l").is_err());
        assert!(username("  ").is_err());
    }

    #[test]
    fn test_amount() {
        assert!(amount("total", 0.0).is_ok());
        assert!(amount("total", -1.0).is_err());
        assert!(amount("total", f64::NAN).is_err());
    }
}
