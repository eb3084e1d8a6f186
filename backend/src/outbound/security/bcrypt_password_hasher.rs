//! bcrypt-backed `PasswordHasher`.

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PASSWORD_MAX_BYTES, PasswordHash};

/// Salted bcrypt hashing at a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl BcryptPasswordHasher {
    /// Hasher using the library default cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher using an explicit cost (4..=31). Low costs are for tests only.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        if plaintext.len() > PASSWORD_MAX_BYTES {
            return Err(PasswordHashError::hashing(format!(
                "password exceeds {PASSWORD_MAX_BYTES} bytes"
            )));
        }
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash::from_stored)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, hash: &PasswordHash, plaintext: &str) -> Result<(), PasswordHashError> {
        // bcrypt only reads the first 72 bytes; longer input never matches.
        if plaintext.len() > PASSWORD_MAX_BYTES {
            return Err(PasswordHashError::Mismatch);
        }
        match bcrypt::verify(plaintext, hash.as_str()) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordHashError::Mismatch),
            Err(err) => Err(PasswordHashError::invalid_hash(err.to_string())),
        }
    }
}
