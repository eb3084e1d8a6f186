//! Builders wiring the account service to its adapters.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use notes_backend::domain::UserAccountService;
use notes_backend::domain::ports::{PasswordHasher, TokenService, UserRepository};
use notes_backend::inbound::http::state::{HttpState, HttpStatePorts};
use notes_backend::outbound::memory::InMemoryUserRepository;
use notes_backend::outbound::persistence::DieselUserRepository;
use notes_backend::outbound::security::{BcryptPasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Expose one account service through every driving port the handlers use.
fn account_ports<R>(
    users: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
) -> HttpStatePorts
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserAccountService::new(users, hasher, tokens.clone()));
    HttpStatePorts {
        registration: service.clone(),
        login: service.clone(),
        profile: service,
        tokens,
    }
}

/// Build HTTP state from the server configuration.
///
/// Uses the Diesel-backed store when a pool is configured, otherwise an
/// in-memory store that forgets every account on restart.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&config.jwt_secret));

    let ports = match &config.db_pool {
        Some(pool) => account_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            hasher,
            tokens,
        ),
        None => {
            warn!("no database pool configured; accounts are kept in memory");
            account_ports(Arc::new(InMemoryUserRepository::new()), hasher, tokens)
        }
    };

    web::Data::new(HttpState::new(ports, config.cookie))
}
