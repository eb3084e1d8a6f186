//! Session cookie helpers to keep HTTP handlers free of token plumbing.
//!
//! Login hands the signed token to the client in the `authorization` cookie.
//! [`AuthenticatedUser`] reads it back on later requests and verifies it
//! through the `TokenService` held in [`HttpState`].

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error, warn};

use crate::domain::{Error, IssuedToken, UserId};
use crate::inbound::http::state::{HttpState, SessionCookieConfig};

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "authorization";

/// Build the session cookie for a freshly issued token.
///
/// The cookie is http-only, `SameSite=Strict`, scoped to `/`, and expires
/// with the token.
pub fn session_cookie(token: &IssuedToken, config: SessionCookieConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, token.token().to_owned())
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .finish();
    match OffsetDateTime::from_unix_timestamp(token.expires_at().timestamp()) {
        Ok(expires) => cookie.set_expires(expires),
        Err(err) => debug!(error = %err, "token expiry outside cookie range; using session cookie"),
    }
    cookie
}

/// User id proven by a valid session cookie.
///
/// Extraction fails with `401 unauthorized` when the cookie is missing,
/// tampered with or expired. On success the [`UserId`] is also stored in the
/// request extensions for later extractors and middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// Authenticated user id.
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HttpState missing from app data");
        return Err(Error::internal("Internal server error"));
    };
    let Some(cookie) = req.cookie(AUTH_COOKIE) else {
        return Err(Error::unauthorized("Unauthorized"));
    };
    state
        .tokens
        .validate(cookie.value())
        .map(|claims| {
            req.extensions_mut().insert(claims.subject);
            AuthenticatedUser(claims.subject)
        })
        .map_err(|err| {
            warn!(error = %err, "session cookie rejected");
            Error::unauthorized("Unauthorized")
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(actix_web::Error::from))
    }
}
