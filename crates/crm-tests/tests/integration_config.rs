// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests from a configuration file to a working session.

use std::collections::HashMap;
use std::fs;

use crm_auth::{SessionConfig, SessionManager};
use crm_config::{ConfigError, ConfigLoader};
use crm_core::{CrmError, Role};
use crm_service::Services;
use crm_tests::prelude::*;

const CONFIG: &str = r#"
secret_key = "file-secret"
token_storage = "state/tokens.json"
data_storage = "state/crm.json"
access_lifetime = 60
refresh_lifetime = 600
"#;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_file_drives_session_config() {
    let dir = temp_test_dir("crm_config");
    let path = dir.path().join("crm.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = ConfigLoader::new().load_with(&path, env(&[])).unwrap();
    let session = SessionConfig::from(&config);

    assert_eq!(session.secret, "file-secret");
    assert_eq!(session.token_path, dir.path().join("state/tokens.json"));
    assert_eq!(session.access_lifetime_secs, 60);
    assert_eq!(session.refresh_lifetime_secs, 600);
    assert_eq!(config.data_storage, dir.path().join("state/crm.json"));
}

#[test]
fn test_environment_overrides_file() {
    let dir = temp_test_dir("crm_config");
    let path = dir.path().join("crm.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = ConfigLoader::new()
        .with_env_prefix("CRM")
        .load_with(
            &path,
            env(&[("CRM_SECRET_KEY", "env-secret"), ("CRM_ACCESS_LIFETIME", "120")]),
        )
        .unwrap();

    assert_eq!(config.secret_key, "env-secret");
    assert_eq!(config.access_lifetime, 120);
    assert_eq!(config.refresh_lifetime, 600);
}

#[test]
fn test_missing_secret_is_rejected() {
    let dir = temp_test_dir("crm_config");

    let err = ConfigLoader::new()
        .load_with(dir.path().join("absent.toml"), env(&[]))
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("secret_key"));
}

#[test]
fn test_bad_lifetime_variable_is_rejected() {
    let dir = temp_test_dir("crm_config");

    let err = ConfigLoader::new()
        .load_with(
            dir.path().join("absent.toml"),
            env(&[("SECRET_KEY", "k"), ("ACCESS_LIFETIME", "soon")]),
        )
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
}

#[test]
fn test_empty_secret_never_reaches_the_codec() {
    let dir = temp_test_dir("crm_config");

    let result = SessionManager::new(SessionConfig::new("", dir.path().join("tokens.json")));

    assert!(matches!(result, Err(CrmError::TokenConfig { .. })));
}

#[test]
fn test_services_from_config() {
    let dir = temp_test_dir("crm_config");
    let path = dir.path().join("crm.toml");
    fs::write(&path, CONFIG).unwrap();
    let config = ConfigLoader::new().load_with(&path, env(&[])).unwrap();

    let services = Services::from_config(&config).unwrap();
    services
        .init(new_collaborator("mia", Role::Management))
        .unwrap();
    let identity = services.users.login("mia", PASSWORD).unwrap();

    assert_eq!(identity.role, Role::Management);
    assert!(config.token_storage.exists());
    assert!(config.data_storage.exists());
}
