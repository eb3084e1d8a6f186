//! Driven port for one-way credential hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing failed (entropy or resource exhaustion).
        Hashing { message: String } => "failed to hash password: {message}",
        /// The plaintext does not reproduce the stored hash.
        Mismatch => "password does not match",
        /// The stored hash could not be parsed.
        InvalidHash { message: String } => "stored password hash is invalid: {message}",
    }
}

/// Salted, deliberately slow password hashing.
///
/// Implementations are CPU-bound and synchronous; async callers should move
/// calls onto a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash suitable for long-term storage.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Succeed only when `plaintext` reproduces `hash`.
    fn verify(&self, hash: &PasswordHash, plaintext: &str) -> Result<(), PasswordHashError>;
}
