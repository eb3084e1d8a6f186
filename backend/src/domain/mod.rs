//! Domain primitives, use-cases and ports.
//!
//! Purpose: define the strongly typed account model used by the HTTP and
//! persistence layers, and the services that register and authenticate
//! users. Nothing in this module knows about Actix or Diesel.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`NewUser`] and their value types: account data.
//! - [`Registration`] and [`LoginCredentials`]: validated request inputs.
//! - [`UserAccountService`]: register, login and current-user use-cases.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountError, LoginOutcome, UserAccountService};
pub use self::auth::{LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode};
pub use self::session::{IssuedToken, SESSION_TTL_HOURS, SessionClaims, session_ttl};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, EMAIL_MAX, EmailAddress, NAME_MAX, NewUser, PASSWORD_MAX_BYTES, PasswordHash,
    User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use notes_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Unauthorized"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
