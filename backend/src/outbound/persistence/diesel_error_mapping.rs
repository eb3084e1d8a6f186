//! Diesel and pool error mapping for the user repository.
//!
//! Driver messages are logged at debug level and replaced with fixed strings
//! so SQL fragments and connection details never reach API responses.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

/// Map a pool checkout or build failure to a connection error.
pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    let message = match error {
        PoolError::Checkout(message) | PoolError::Build(message) => message,
    };
    debug!(%message, "user repository pool failure");
    UserPersistenceError::connection("database connection error")
}

/// Map Diesel failures on reads and generic writes.
pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::NotFound,
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Map Diesel failures on insert, surfacing unique violations as duplicates.
///
/// `email` is the only unique column besides the generated key, so any unique
/// violation on insert means the address is taken.
pub(super) fn map_insert_error(error: DieselError, email: &str) -> UserPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(
                constraint = info.constraint_name(),
                "user insert hit unique constraint"
            );
            UserPersistenceError::duplicate_email(email)
        }
        other => map_diesel_error(other),
    }
}
