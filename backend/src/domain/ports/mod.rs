//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `PasswordHasher`, `TokenService`) are
//! implemented by outbound adapters. Driving ports (`RegistrationService`,
//! `LoginService`, `UserProfileQuery`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod registration_service;
mod token_service;
mod user_profile_query;
mod user_repository;

pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_repository::{UserPersistenceError, UserRepository};
