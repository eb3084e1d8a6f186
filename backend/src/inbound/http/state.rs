//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, RegistrationService, TokenService, UserProfileQuery};

/// Attributes applied to the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieConfig {
    /// Emit the `Secure` attribute. Disable only for plain-HTTP local runs.
    pub secure: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub tokens: Arc<dyn TokenService>,
    pub cookie: SessionCookieConfig,
}

impl HttpState {
    /// Construct state from port implementations and cookie settings.
    pub fn new(ports: HttpStatePorts, cookie: SessionCookieConfig) -> Self {
        let HttpStatePorts {
            registration,
            login,
            profile,
            tokens,
        } = ports;
        Self {
            registration,
            login,
            profile,
            tokens,
            cookie,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, SessionCookieConfig::default())
    }
}
