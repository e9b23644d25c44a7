use std::env;

use tracing::warn;

pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// 24 hours.
pub const DEFAULT_TOKEN_EXPIRY: i64 = 86_400;

/// Settings for the token codec.
///
/// Loaded once at startup and handed to the codec; nothing reads the secret
/// from the environment afterwards. Changing `JWT_SECRET` and restarting
/// invalidates every token issued before.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            secret,
            token_expiry: env::var("JWT_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRY),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            token_expiry: DEFAULT_TOKEN_EXPIRY,
        }
    }
}
