//! HS256 session tokens.
//!
//! Claims carry the subject id and email plus `iat`/`exp` in unix seconds.
//! Tokens are not stored; signature and expiry are the whole validity check.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::UserRef;
use super::errors::AuthError;

/// Default session lifetime: 5 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing secret and lifetime. `Debug` hides the secret.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self { secret: secret.into(), ttl }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig").field("secret", &"<redacted>").field("ttl", &self.ttl).finish()
    }
}

/// Sign a token for `user` valid from now for the configured lifetime.
pub fn issue(user: &UserRef, cfg: &TokenConfig) -> Result<String, AuthError> {
    issue_at(user, cfg, chrono::Utc::now().timestamp())
}

pub fn issue_at(user: &UserRef, cfg: &TokenConfig, now: i64) -> Result<String, AuthError> {
    let ttl = i64::try_from(cfg.ttl.as_secs()).map_err(AuthError::internal)?;
    let exp = now.checked_add(ttl).ok_or_else(|| AuthError::internal("token ttl overflows expiry"))?;
    let claims = Claims { id: user.id, email: user.email.clone(), iat: now, exp };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(cfg.secret.as_bytes()))
        .map_err(AuthError::internal)
}

/// Check signature and expiry (no leeway) and return the claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
