// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session manager.
//!
//! # Sliding renewal
//!
//! `verify` reads the token file and decodes the access token. An expired
//! access token is replaced using the refresh token:
//!
//! ```text
//! read ─ empty ──────────────────────────────▶ BadToken(NoAccess)
//!  │
//! decode access ─ ok ────────────────────────▶ accept
//!  │            └ invalid ───────────────────▶ BadToken(Invalid)
//!  │ expired
//! decode refresh ─ missing ─ wipe ───────────▶ BadToken(MissingRefresh)
//!  │             └ failed ─ wipe ────────────▶ BadToken(InvalidRefresh)
//!  │ ok
//! reissue access, keep refresh, write ───────▶ accept
//! ```
//!
//! The refresh token is never reissued, so renewal cannot outlive it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crm_core::{CrmError, CrmResult, TokenFault};

use crate::claims::{AccessClaims, RefreshClaims};
use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::identity::{session_denial, Identity, IdentityProvider};
use crate::storage::TokenStore;
use crate::token::TokenCodec;

// =============================================================================
// SessionManager
// =============================================================================

/// Issues, verifies and wipes the local session.
///
/// This is the only component that writes the token file.
#[derive(Debug, Clone)]
pub struct SessionManager {
    codec: TokenCodec,
    store: TokenStore,
    clock: Arc<dyn Clock>,
    access_lifetime: i64,
    refresh_lifetime: i64,
}

impl SessionManager {
    /// Creates a manager reading the system clock.
    pub fn new(config: SessionConfig) -> CrmResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a manager reading the given clock.
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> CrmResult<Self> {
        config.validate()?;

        Ok(Self {
            codec: TokenCodec::new(&config.secret, clock.clone())?,
            store: TokenStore::new(config.token_path),
            clock,
            access_lifetime: config.access_lifetime_secs,
            refresh_lifetime: config.refresh_lifetime_secs,
        })
    }

    /// Returns the token store.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Starts a session for `identity`, replacing any existing one.
    pub fn issue(&self, identity: &Identity) -> CrmResult<AccessClaims> {
        let now = self.clock.now();
        let access = AccessClaims::new(identity, now, self.access_lifetime);
        let refresh = RefreshClaims::new(&identity.subject, now, self.refresh_lifetime);

        self.store
            .write(&self.codec.encode(&access)?, &self.codec.encode(&refresh)?)?;

        info!(subject = %identity.subject, exp = access.exp, "Session issued");
        Ok(access)
    }

    /// Returns the current access claims, renewing an expired access token.
    pub fn verify(&self) -> CrmResult<AccessClaims> {
        let tokens = self
            .store
            .read()
            .ok_or_else(|| CrmError::bad_token(TokenFault::NoAccess))?;

        match self.codec.decode::<AccessClaims>(&tokens.access, true) {
            Ok(claims) => Ok(claims),
            Err(CrmError::ExpiredToken) => {
                debug!("Access token expired, attempting renewal");
                self.renew(&tokens.access, tokens.refresh.as_deref())
            }
            Err(err) => Err(err),
        }
    }

    fn renew(&self, access: &str, refresh: Option<&str>) -> CrmResult<AccessClaims> {
        let Some(refresh) = refresh else {
            return self.abandon(TokenFault::MissingRefresh);
        };

        let refresh_claims = match self.codec.decode::<RefreshClaims>(refresh, true) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err, "Refresh token rejected");
                return self.abandon(TokenFault::InvalidRefresh);
            }
        };

        let expired = self.codec.decode::<AccessClaims>(access, false)?;
        if expired.sub != refresh_claims.sub {
            warn!("Refresh token subject does not match access token");
            return self.abandon(TokenFault::InvalidRefresh);
        }

        let renewed = expired.renewed(self.clock.now(), self.access_lifetime);
        self.store.write(&self.codec.encode(&renewed)?, refresh)?;

        debug!(subject = %renewed.sub, exp = renewed.exp, "Access token renewed");
        Ok(renewed)
    }

    /// Wipes the token file, then reports `fault`.
    fn abandon(&self, fault: TokenFault) -> CrmResult<AccessClaims> {
        match self.store.wipe() {
            Ok(()) | Err(CrmError::NoSession) => {}
            Err(err) => return Err(err),
        }
        info!(reason = fault.message(), "Session discarded");
        Err(CrmError::bad_token(fault))
    }

    /// Ends the session; fails with `NoSession` if there was none.
    pub fn wipe(&self) -> CrmResult<()> {
        self.store.wipe()
    }
}

impl IdentityProvider for SessionManager {
    fn current_identity(&self) -> CrmResult<Identity> {
        self.verify()
            .and_then(|claims| Identity::from_claims(&claims))
            .map_err(session_denial)
    }
}

// =============================================================================
// Tests
// =============================================================================
