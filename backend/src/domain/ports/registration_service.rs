//! Driving port for the sign-up use-case.

use async_trait::async_trait;

use crate::domain::{AccountError, Registration, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Hash the password and persist a new user.
    async fn register(&self, registration: &Registration) -> Result<User, AccountError>;
}
