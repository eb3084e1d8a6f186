//! Backend entry-point: loads configuration, prepares the database and serves
//! the account API.

mod server;

use std::io;

use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use notes_backend::config::AppSettings;
use notes_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level()));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let config = settings.validate().map_err(|e| {
        error!(error = %e, "invalid configuration");
        io::Error::other(e)
    })?;

    let database_url = config.database.url();
    let applied = run_migrations(database_url.as_str()).await.map_err(|e| {
        error!(error = %e, "database migration failed");
        io::Error::other(e)
    })?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(
        PoolConfig::new(database_url.as_str()).with_max_size(config.database.pool_size()),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "database pool construction failed");
        io::Error::other(e)
    })?;

    let server_config = ServerConfig::new(
        config.bind_addr,
        config.jwt_secret.clone(),
        config.cookie_secure,
    )
    .with_db_pool(pool);

    create_server(server_config)?.await
}
