// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HS256 token codec.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crm_core::{CrmError, CrmResult, TokenFault};

use crate::claims::Expiring;
use crate::clock::Clock;

// =============================================================================
// TokenCodec
// =============================================================================

/// Signs and verifies compact JWS tokens.
///
/// The signature is always checked. Expiry is checked against the injected
/// clock, separately, so that a just-expired token can still be read back.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec for `secret`.
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> CrmResult<Self> {
        if secret.is_empty() {
            return Err(CrmError::token_config("secret is not configured"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
            clock,
        })
    }

    /// Encodes claims into a token.
    pub fn encode<T: Serialize>(&self, claims: &T) -> CrmResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| CrmError::token_config(format!("Failed to create token: {}", e)))
    }

    /// Decodes a token, rejecting it when `exp <= now` if `verify_exp` is set.
    pub fn decode<T>(&self, token: &str, verify_exp: bool) -> CrmResult<T>
    where
        T: DeserializeOwned + Expiring,
    {
        let data = decode::<T>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => CrmError::ExpiredToken,
                ErrorKind::InvalidKeyFormat
                | ErrorKind::InvalidRsaKey(_)
                | ErrorKind::InvalidEcdsaKey => CrmError::token_config(e.to_string()),
                _ => {
                    tracing::debug!(error = %e, "Token rejected");
                    CrmError::bad_token(TokenFault::Invalid)
                }
            }
        })?;

        if verify_exp && data.claims.exp() <= self.clock.now() {
            return Err(CrmError::ExpiredToken);
        }
        Ok(data.claims)
    }

    /// Returns the codec clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{AccessClaims, RefreshClaims};
    use crate::clock::ManualClock;

    fn codec(secret: &str, now: i64) -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        (TokenCodec::new(secret, clock.clone()).unwrap(), clock)
    }

    fn access(iat: i64, exp: i64) -> AccessClaims {
        AccessClaims {
            sub: "alice".to_string(),
            c_id: 7,
            role: 3,
            name: "A L".to_string(),
            iat,
            exp,
        }
    }

    #[test]
    fn test_round_trip() {
        let (codec, _) = codec("k", 1000);
        let claims = access(1000, 1030);
        let token = codec.encode(&claims).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.decode::<AccessClaims>(&token, true).unwrap(), claims);
    }

    #[test]
    fn test_expired_only_when_verifying() {
        let (codec, clock) = codec("k", 1000);
        let token = codec.encode(&RefreshClaims::new("alice", 1000, 300)).unwrap();

        clock.set(1299);
        assert!(codec.decode::<RefreshClaims>(&token, true).is_ok());

        clock.set(1300);
        let err = codec.decode::<RefreshClaims>(&token, true).unwrap_err();
        assert!(matches!(err, CrmError::ExpiredToken));
        assert_eq!(codec.decode::<RefreshClaims>(&token, false).unwrap().sub, "alice");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let (signer, _) = codec("k", 1000);
        let (verifier, _) = codec("other", 1000);
        let token = signer.encode(&access(1000, 1030)).unwrap();

        let err = verifier.decode::<AccessClaims>(&token, false).unwrap_err();
        assert!(matches!(err, CrmError::BadToken { fault: TokenFault::Invalid }));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let (codec, _) = codec("k", 1000);
        for token in ["", "abc", "a.b.c", "not.a.token.at.all"] {
            let err = codec.decode::<AccessClaims>(token, false).unwrap_err();
            assert!(matches!(err, CrmError::BadToken { fault: TokenFault::Invalid }));
        }
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        let err = TokenCodec::new("", Arc::new(ManualClock::new(0))).unwrap_err();
        assert!(matches!(err, CrmError::TokenConfig { .. }));
    }
}
