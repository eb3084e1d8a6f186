//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use notes_backend::inbound::http::state::SessionCookieConfig;
use notes_backend::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cookie: SessionCookieConfig,
    pub(crate) jwt_secret: Zeroizing<String>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from the validated application settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: Zeroizing<String>, cookie_secure: bool) -> Self {
        Self {
            bind_addr,
            cookie: SessionCookieConfig {
                secure: cookie_secure,
            },
            jwt_secret,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the user store.
    ///
    /// Without a pool the server keeps accounts in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
