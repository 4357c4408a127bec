// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Local token file.
//!
//! The file holds the current token pair as a JSON object:
//!
//! ```json
//! { "access-token": "<jws>", "refresh-token": "<jws>" }
//! ```
//!
//! A file that is absent, unreadable or of any other shape reads as no session.
//! A file holding only the access token still reads, so the session manager
//! can report the missing refresh token.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crm_core::{CrmError, CrmResult};

/// Token pair read from the file.
///
/// `refresh` is `None` when the file carries an access token but no refresh
/// token, which the session manager reports as a missing refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTokens {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenFile {
    #[serde(rename = "access-token")]
    access: String,
    #[serde(rename = "refresh-token", default)]
    refresh: Option<String>,
}

// =============================================================================
// TokenStore
// =============================================================================

/// The single file holding the current session.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the token file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the token pair. Never fails.
    pub fn read(&self) -> Option<StoredTokens> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %e, "Token file unreadable");
                }
                return None;
            }
        };

        let file: TokenFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Token file malformed");
                return None;
            }
        };

        if file.access.is_empty() {
            return None;
        }
        Some(StoredTokens {
            access: file.access,
            refresh: file.refresh.filter(|r| !r.is_empty()),
        })
    }

    /// Writes the token pair, replacing any previous file.
    pub fn write(&self, access: &str, refresh: &str) -> CrmResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&TokenFile {
            access: access.to_string(),
            refresh: Some(refresh.to_string()),
        })?;

        let mut file = open_private(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        debug!(path = %self.path.display(), "Token file written");
        Ok(())
    }

    /// Removes the file; fails with `NoSession` if there was none.
    pub fn wipe(&self) -> CrmResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Token file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CrmError::NoSession),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session").join("tokens.json"));
        (dir, store)
    }

    #[test]
    fn test_write_then_read() {
        let (_dir, store) = store();
        assert_eq!(store.read(), None);

        store.write("a.b.c", "d.e.f").unwrap();
        assert_eq!(
            store.read(),
            Some(StoredTokens {
                access: "a.b.c".to_string(),
                refresh: Some("d.e.f".to_string()),
            })
        );

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["access-token"], "a.b.c");
        assert_eq!(raw["refresh-token"], "d.e.f");
    }

    #[test]
    fn test_malformed_reads_as_empty() {
        let (_dir, store) = store();
        store.write("a", "b").unwrap();

        for content in ["", "{", "[]", "{\"token\": \"x\"}", "{\"access-token\": \"\"}"] {
            fs::write(store.path(), content).unwrap();
            assert_eq!(store.read(), None, "content: {content}");
        }
    }

    #[test]
    fn test_missing_refresh_is_reported() {
        let (_dir, store) = store();
        store.write("a", "b").unwrap();
        fs::write(store.path(), "{\"access-token\": \"a\"}").unwrap();

        let tokens = store.read().unwrap();
        assert_eq!(tokens.refresh, None);
    }

    #[test]
    fn test_wipe() {
        let (_dir, store) = store();
        assert!(matches!(store.wipe(), Err(CrmError::NoSession)));

        store.write("a", "b").unwrap();
        store.wipe().unwrap();
        assert!(!store.exists());
        assert!(matches!(store.wipe(), Err(CrmError::NoSession)));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = store();
        store.write("a", "b").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
