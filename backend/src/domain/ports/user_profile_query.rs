//! Driving port for reading the authenticated user's account.

use async_trait::async_trait;

use crate::domain::{AccountError, User, UserId};

/// Domain use-case port for the current-user lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Load the account a verified session refers to.
    async fn current_user(&self, user_id: UserId) -> Result<User, AccountError>;
}
