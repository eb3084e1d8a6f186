//! HS512 JWT `TokenService`.
//!
//! Tokens carry three claims: `sub` (the decimal user id), `iat` and `exp`
//! (Unix seconds). Expiry is checked against the injected clock rather than
//! the library's wall-clock check so tests can pin time.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{IssuedToken, SessionClaims, UserId, session_ttl};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies session tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("algorithm", &Algorithm::HS512)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    /// Service signing with `secret` and reading time from the system clock.
    pub fn new(secret: &Zeroizing<String>) -> Self {
        Self::with_clock(secret, Arc::new(DefaultClock))
    }

    /// Service signing with `secret` and reading time from `clock`.
    pub fn with_clock(secret: &Zeroizing<String>, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    fn invalid(reason: impl Into<String>) -> TokenError {
        let err = TokenError::invalid(reason);
        debug!(error = %err, "session token rejected");
        err
    }
}

fn from_timestamp(seconds: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| JwtTokenService::invalid(format!("{claim} out of range")))
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: UserId) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + session_ttl();
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        let expires_at = from_timestamp(claims.exp, "exp")?;
        Ok(IssuedToken::new(token, expires_at))
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| Self::invalid(err.to_string()))?;
        let claims = data.claims;

        let expires_at = from_timestamp(claims.exp, "exp")?;
        if expires_at <= self.clock.utc() {
            return Err(Self::invalid("token expired"));
        }
        let issued_at = from_timestamp(claims.iat, "iat")?;
        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|err| Self::invalid(format!("sub: {err}")))?;

        Ok(SessionClaims {
            subject,
            issued_at,
            expires_at,
        })
    }
}
