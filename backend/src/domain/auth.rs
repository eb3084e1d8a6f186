//! Authentication inputs: registration details and login credentials.
//!
//! Handlers parse raw strings through these constructors before talking to a
//! use-case port, so services only ever see validated values. Plaintext
//! passwords are held in [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use super::{DisplayName, EmailAddress, PASSWORD_MAX_BYTES, UserValidationError};

fn require_password(password: &str) -> Result<Zeroizing<String>, UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(UserValidationError::PasswordTooLong {
            max: PASSWORD_MAX_BYTES,
        });
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated sign-up request.
///
/// ## Invariants
/// - `name` and `email` satisfy their value-type rules.
/// - `password` is non-empty, at most 72 bytes, and whitespace is kept verbatim.
///
/// # Examples
/// ```
/// use notes_backend::domain::Registration;
///
/// let registration =
///     Registration::try_from_parts("Ada", "ada@example.com", "hunter2").unwrap();
/// assert_eq!(registration.email().as_ref(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw sign-up fields.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: DisplayName::new(name)?,
            email: EmailAddress::new(email)?,
            password: require_password(password)?,
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Login email for the new account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use notes_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: require_password(password)?,
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
