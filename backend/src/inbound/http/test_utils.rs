//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::UserAccountService;
use crate::inbound::http::state::{HttpState, HttpStatePorts, SessionCookieConfig};
use crate::outbound::memory::InMemoryUserRepository;
use crate::outbound::security::{BcryptPasswordHasher, JwtTokenService};

/// Signing secret shared by HTTP tests.
pub const TEST_JWT_SECRET: &str = "http-test-signing-secret";

/// Build handler state backed by the in-memory store.
///
/// - Uses bcrypt cost 4 so password hashing stays fast.
/// - Disables the cookie `Secure` flag for plain-HTTP test requests.
pub fn in_memory_state() -> HttpState {
    let tokens = Arc::new(JwtTokenService::new(&Zeroizing::new(
        TEST_JWT_SECRET.to_owned(),
    )));
    let service = Arc::new(UserAccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(BcryptPasswordHasher::with_cost(4)),
        tokens.clone(),
    ));
    HttpState::new(
        HttpStatePorts {
            registration: service.clone(),
            login: service.clone(),
            profile: service,
            tokens,
        },
        SessionCookieConfig { secure: false },
    )
}
