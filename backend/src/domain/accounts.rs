//! Account use-cases: registration, login and current-user lookup.
//!
//! [`UserAccountService`] composes the user store, the password hasher and
//! the token signer, and folds their outcomes into [`AccountError`]. Nothing
//! here retries; every failure is terminal for the request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use super::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegistrationService, TokenError,
    TokenService, UserPersistenceError, UserProfileQuery, UserRepository,
};
use super::{
    Error, IssuedToken, LoginCredentials, NewUser, PasswordHash, Registration, TraceId, User,
    UserId,
};

/// Outcomes the account use-cases surface to inbound adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// Registration hit an email that is already taken.
    #[error("User already exists")]
    UserAlreadyExists,
    /// No account matches the login email or session subject.
    #[error("User not found")]
    UserNotFound,
    /// The password does not match the stored hash.
    #[error("Incorrect password")]
    IncorrectPassword,
    /// The password could not be hashed.
    #[error("failed to hash password")]
    HashingFailure(#[source] PasswordHashError),
    /// The stored hash for the account cannot be parsed.
    #[error("stored password hash is invalid")]
    InvalidStoredHash(#[source] PasswordHashError),
    /// The session token could not be signed.
    #[error("failed to sign token")]
    TokenIssuanceFailure(#[source] TokenError),
    /// Any other store failure, passed through unchanged.
    #[error(transparent)]
    Persistence(#[from] UserPersistenceError),
}

impl From<AccountError> for Error {
    fn from(value: AccountError) -> Self {
        let message = value.to_string();
        match value {
            AccountError::UserAlreadyExists => Self::conflict(message),
            AccountError::UserNotFound => Self::not_found(message),
            AccountError::IncorrectPassword => Self::unauthorized(message),
            AccountError::HashingFailure(_)
            | AccountError::InvalidStoredHash(_)
            | AccountError::TokenIssuanceFailure(_)
            | AccountError::Persistence(_) => Self::internal(message),
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Authenticated user.
    pub user_id: UserId,
    /// Session token to hand to the client.
    pub token: IssuedToken,
}

/// Account service backed by a user repository, a hasher and a token signer.
pub struct UserAccountService<R> {
    users: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl<R> Clone for UserAccountService<R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<R> UserAccountService<R>
where
    R: UserRepository,
{
    /// Wire the service to its driven ports.
    pub fn new(
        users: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a user, optionally inside a caller-owned store session.
    pub async fn register_with_session(
        &self,
        registration: &Registration,
        session: Option<&mut R::Session>,
    ) -> Result<User, AccountError> {
        let password_hash = self.hash_password(registration.password()).await?;
        let record = NewUser::new(
            registration.name().clone(),
            registration.email().clone(),
            password_hash,
        );

        let user = self
            .users
            .create(&record, session)
            .await
            .map_err(|err| match err {
                UserPersistenceError::DuplicateEmail { .. } => AccountError::UserAlreadyExists,
                other => AccountError::Persistence(other),
            })?;

        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Authenticate credentials, optionally inside a caller-owned store session.
    pub async fn login_with_session(
        &self,
        credentials: &LoginCredentials,
        session: Option<&mut R::Session>,
    ) -> Result<LoginOutcome, AccountError> {
        let user = self
            .users
            .find_by_email(credentials.email(), session)
            .await
            .map_err(|err| match err {
                UserPersistenceError::NotFound => {
                    warn!("login rejected: unknown email");
                    AccountError::UserNotFound
                }
                other => AccountError::Persistence(other),
            })?;

        self.verify_password(user.password_hash(), credentials.password())
            .await
            .inspect_err(|_| warn!(user_id = %user.id(), "login rejected"))?;

        let token = self.tokens.issue(user.id()).map_err(|err| {
            error!(user_id = %user.id(), error = %err, "session token signing failed");
            AccountError::TokenIssuanceFailure(err)
        })?;

        info!(user_id = %user.id(), "user logged in");
        Ok(LoginOutcome {
            user_id: user.id(),
            token,
        })
    }

    async fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, AccountError> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let task = run_blocking(move || hasher.hash(&plaintext));
        match task.await {
            Ok(result) => result.map_err(|err| {
                error!(error = %err, "password hashing failed");
                AccountError::HashingFailure(err)
            }),
            Err(join_error) => Err(AccountError::HashingFailure(PasswordHashError::hashing(
                join_error.to_string(),
            ))),
        }
    }

    async fn verify_password(
        &self,
        hash: &PasswordHash,
        plaintext: &str,
    ) -> Result<(), AccountError> {
        let hasher = Arc::clone(&self.hasher);
        let hash = hash.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let task = run_blocking(move || hasher.verify(&hash, &plaintext));
        match task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(PasswordHashError::Mismatch)) => Err(AccountError::IncorrectPassword),
            Ok(Err(err @ PasswordHashError::InvalidHash { .. })) => {
                error!(error = %err, "stored password hash is unreadable");
                Err(AccountError::InvalidStoredHash(err))
            }
            Ok(Err(err @ PasswordHashError::Hashing { .. })) => {
                Err(AccountError::HashingFailure(err))
            }
            Err(join_error) => Err(AccountError::HashingFailure(PasswordHashError::hashing(
                join_error.to_string(),
            ))),
        }
    }
}

/// Run CPU-bound work on the blocking pool, keeping the request's trace id.
fn run_blocking<F, T>(work: F) -> tokio::task::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || {
        let _span = trace_id
            .map(|id| tracing::debug_span!("blocking", trace_id = %id).entered());
        work()
    })
}

#[async_trait]
impl<R> RegistrationService for UserAccountService<R>
where
    R: UserRepository + 'static,
{
    async fn register(&self, registration: &Registration) -> Result<User, AccountError> {
        self.register_with_session(registration, None).await
    }
}

#[async_trait]
impl<R> LoginService for UserAccountService<R>
where
    R: UserRepository + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, AccountError> {
        self.login_with_session(credentials, None).await
    }
}

#[async_trait]
impl<R> UserProfileQuery for UserAccountService<R>
where
    R: UserRepository + 'static,
{
    async fn current_user(&self, user_id: UserId) -> Result<User, AccountError> {
        self.users
            .find_by_id(user_id, None)
            .await
            .map_err(|err| match err {
                UserPersistenceError::NotFound => AccountError::UserNotFound,
                other => AccountError::Persistence(other),
            })
    }
}
