//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The session type is a raw [`AsyncPgConnection`]. Callers that want the
//! repository to join a transaction open one on their own connection and pass
//! it in; otherwise each call checks out a pooled connection.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, NewUser, PasswordHash, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_insert_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn checkout<'a>(
        &'a self,
        session: Option<&'a mut AsyncPgConnection>,
    ) -> Result<Checkout<'a>, UserPersistenceError> {
        match session {
            Some(conn) => Ok(Checkout::Borrowed(conn)),
            None => self
                .pool
                .get()
                .await
                .map(Checkout::Pooled)
                .map_err(map_pool_error),
        }
    }
}

/// Connection used for one repository call.
enum Checkout<'a> {
    Borrowed(&'a mut AsyncPgConnection),
    Pooled(PooledConnection<'a, AsyncPgConnection>),
}

impl Checkout<'_> {
    fn conn(&mut self) -> &mut AsyncPgConnection {
        match self {
            Self::Borrowed(conn) => &mut **conn,
            Self::Pooled(pooled) => &mut **pooled,
        }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        tracing::warn!(user_id = row.id, error = %err, "stored user row failed validation");
        UserPersistenceError::query("stored user row is invalid")
    };
    let id = UserId::new(row.id).map_err(invalid)?;
    let name = DisplayName::new(&row.name).map_err(invalid)?;
    let email = EmailAddress::new(&row.email).map_err(invalid)?;
    let record = NewUser::new(name, email, PasswordHash::from_stored(row.password_hash));
    Ok(User::new(id, record, row.created_at, row.updated_at))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    type Session = AsyncPgConnection;

    async fn create(
        &self,
        user: &NewUser,
        session: Option<&mut AsyncPgConnection>,
    ) -> Result<User, UserPersistenceError> {
        let mut checkout = self.checkout(session).await?;
        let new_row = NewUserRow {
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().as_str(),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(checkout.conn())
            .await
            .map_err(|err| map_insert_error(err, user.email().as_ref()))?;

        row_to_user(row)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
        session: Option<&mut AsyncPgConnection>,
    ) -> Result<User, UserPersistenceError> {
        let mut checkout = self.checkout(session).await?;

        let row: UserRow = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(checkout.conn())
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_by_id(
        &self,
        id: UserId,
        session: Option<&mut AsyncPgConnection>,
    ) -> Result<User, UserPersistenceError> {
        let mut checkout = self.checkout(session).await?;

        let row: UserRow = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(checkout.conn())
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }
}
