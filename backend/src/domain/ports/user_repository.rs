//! Driven port for user persistence.
//!
//! Every operation accepts an optional caller-owned session (a connection or
//! transaction handle) so the call can join wider transactional work. The
//! fallback when no session is passed is decided by each adapter and by
//! nothing else: adapters check out their own default connection.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// A connection could not be obtained or was lost.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email is already registered; nothing was written.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// No user matched the lookup.
        NotFound => "user not found",
    }
}

/// User store contract consumed by the account service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Caller-supplied connection or transaction handle.
    type Session: Send;

    /// Insert a new user and return it with store-assigned id and timestamps.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// taken, distinguishable from every other storage failure.
    async fn create(
        &self,
        user: &NewUser,
        session: Option<&mut Self::Session>,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by login email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
        session: Option<&mut Self::Session>,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(
        &self,
        id: UserId,
        session: Option<&mut Self::Session>,
    ) -> Result<User, UserPersistenceError>;
}
