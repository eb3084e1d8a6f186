//! Driven port for session token issuance and validation.

use crate::domain::{IssuedToken, SessionClaims, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token services.
    ///
    /// Every validation problem (bad signature, corruption, expiry) is
    /// reported as [`TokenError::Invalid`]; `reason` is for logs only.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "failed to sign token: {message}",
        /// The token is not acceptable.
        Invalid { reason: String } => "invalid token: {reason}",
    }
}

/// Issues and validates signed, time-bounded session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `subject`, valid from now for the session lifetime.
    fn issue(&self, subject: UserId) -> Result<IssuedToken, TokenError>;

    /// Verify signature and expiry and return the embedded claims.
    fn validate(&self, token: &str) -> Result<SessionClaims, TokenError>;
}
