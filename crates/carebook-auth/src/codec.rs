//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]. Validation uses zero leeway, so
//! a token is rejected the second its `exp` passes.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use carebook_config::JwtConfig;
use carebook_core::AuthError;

use crate::claims::Claims;

/// Issues and verifies signed, time-limited identity tokens.
///
/// Cheap to clone; the keys are built once from the injected secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            config.secret.as_bytes(),
            Duration::seconds(config.token_expiry),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a token for `user_id` expiring `ttl` from now.
    ///
    /// # Errors
    ///
    /// [`AuthError::TokenSigning`] if encoding fails. Not expected with an
    /// HMAC key; callers surface it as a 500.
    pub fn issue(&self, user_id: i32) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            exp: (now + self.ttl).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Returns the embedded user id.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidToken`] when the signature does not verify, the
    /// token is malformed, or it has expired.
    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
