// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Rendering of command results on stdout.

use serde::Serialize;
use serde_json::{json, Value};

use crm_auth::Identity;
use crm_core::Collaborator;

use crate::cli::OutputFormat;
use crate::error::BinResult;

/// Public view of a collaborator; the password hash never leaves the store.
pub fn collaborator_view(c: &Collaborator) -> Value {
    json!({
        "id": c.id,
        "username": c.username,
        "first_name": c.first_name,
        "last_name": c.last_name,
        "email": c.email,
        "role": c.role.as_str(),
    })
}

/// Public view of an identity.
pub fn identity_view(identity: &Identity) -> Value {
    json!({
        "username": identity.subject,
        "id": identity.collaborator_id,
        "role": identity.role.as_str(),
        "name": identity.display_name,
    })
}

/// Prints one record.
pub fn print_record<T: Serialize>(format: OutputFormat, record: &T) -> BinResult<()> {
    let value = serde_json::to_value(record).map_err(crm_core::CrmError::from)?;
    println!("{}", render(format, &value));
    Ok(())
}

/// Prints a list of records.
pub fn print_records<T: Serialize>(format: OutputFormat, records: &[T]) -> BinResult<()> {
    let value = serde_json::to_value(records).map_err(crm_core::CrmError::from)?;
    println!("{}", render(format, &value));
    Ok(())
}

/// Renders a value: pretty JSON, or `key: value` blocks separated by blank lines.
pub fn render(format: OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        OutputFormat::Text => match value {
            Value::Array(items) if items.is_empty() => "(none)".to_string(),
            Value::Array(items) => items
                .iter()
                .map(render_text)
                .collect::<Vec<_>>()
                .join("\n\n"),
            other => render_text(other),
        },
    }
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            map.iter()
                .map(|(key, v)| format!("{:width$}  {}", key, scalar(v), width = width))
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
