//! Stateless session tokens.
//!
//! A session is nothing more than a signed token naming a user and a validity
//! window. No server-side record exists; validity is decided by signature and
//! expiry each time the token is presented.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use super::UserId;

/// Lifetime of an issued session token, in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Lifetime of an issued session token.
pub fn session_ttl() -> TimeDelta {
    TimeDelta::hours(SESSION_TTL_HOURS)
}

/// Verified contents of a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    /// User the token was issued to.
    pub subject: UserId,
    /// Issue instant.
    pub issued_at: DateTime<Utc>,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Freshly signed token together with its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Pair an encoded token with the expiry embedded in it.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Encoded token string.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Expiry embedded in the token.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
