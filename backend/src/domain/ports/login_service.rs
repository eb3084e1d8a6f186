//! Driving port for the login use-case.
//!
//! Inbound adapters call this port to exchange credentials for a session
//! token without knowing which store, hasher or signer sit behind it, so
//! handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{AccountError, LoginCredentials, LoginOutcome};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and issue a session token for the matching user.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, AccountError>;
}
