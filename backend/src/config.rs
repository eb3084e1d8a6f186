//! Application configuration loaded via OrthoConfig.
//!
//! [`AppSettings`] is the raw layered view (CLI flags, `NOTES_*` environment
//! variables, config files). [`AppSettings::validate`] turns it into the typed
//! [`AppConfig`] handed to the server builder. Required values that are absent
//! or blank fail start-up before the listener binds.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SSL_MODE: &str = "disable";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Failure to turn [`AppSettings`] into an [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required value is absent or blank.
    #[error("missing required configuration value `{field}`")]
    Missing { field: &'static str },
    /// A value is present but cannot be used.
    #[error("invalid configuration value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Layered settings with the `NOTES` prefix.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTES")]
pub struct AppSettings {
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    /// libpq `sslmode` for database connections.
    pub db_ssl_mode: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// HMAC secret for session tokens.
    pub jwt_secret: Option<String>,
    /// Mark the session cookie `Secure`. Disable only for plain-HTTP development.
    pub cookie_secure: Option<bool>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("log_level", &self.log_level)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "<redacted>"))
            .field("db_name", &self.db_name)
            .field("db_ssl_mode", &self.db_ssl_mode)
            .field("db_pool_size", &self.db_pool_size)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(ConfigError::Missing { field })
}

impl AppSettings {
    /// Return the configured log level, falling back to `info`.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Return the configured pool size, falling back to 10.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Whether the session cookie carries `Secure`, defaulting to `true`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Validate the layered values and build the typed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for any absent or blank required value
    /// and [`ConfigError::Invalid`] when the bind address or pool size cannot
    /// be used.
    pub fn validate(&self) -> Result<AppConfig, ConfigError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.trim().parse().map_err(|_| ConfigError::Invalid {
            field: "host",
            reason: format!("`{host}` is not an IP address"),
        })?;
        let bind_addr = SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT));

        let pool_size = self.db_pool_size();
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                field: "db_pool_size",
                reason: "must be at least 1".to_owned(),
            });
        }

        let database = DatabaseSettings::new(
            DatabaseParts {
                host: required("db_host", self.db_host.as_deref())?,
                port: self.db_port.ok_or(ConfigError::Missing { field: "db_port" })?,
                user: required("db_user", self.db_user.as_deref())?,
                password: Zeroizing::new(required("db_password", self.db_password.as_deref())?),
                name: required("db_name", self.db_name.as_deref())?,
                ssl_mode: self
                    .db_ssl_mode
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .unwrap_or(DEFAULT_SSL_MODE)
                    .to_owned(),
            },
            pool_size,
        )?;
        let jwt_secret = Zeroizing::new(required("jwt_secret", self.jwt_secret.as_deref())?);

        Ok(AppConfig {
            log_level: self.log_level().to_owned(),
            bind_addr,
            database,
            jwt_secret,
            cookie_secure: self.cookie_secure(),
        })
    }
}

struct DatabaseParts {
    host: String,
    port: u16,
    user: String,
    password: Zeroizing<String>,
    name: String,
    ssl_mode: String,
}

fn invalid_db_host(reason: impl fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        field: "db_host",
        reason: reason.to_string(),
    }
}

/// PostgreSQL connection parameters.
#[derive(Clone)]
pub struct DatabaseSettings {
    host: String,
    port: u16,
    user: String,
    name: String,
    ssl_mode: String,
    pool_size: u32,
    url: Zeroizing<String>,
}

impl DatabaseSettings {
    /// Credentials and the database name are percent-encoded, so reserved
    /// characters such as `@`, `/` or `#` cannot change the target host.
    fn new(parts: DatabaseParts, pool_size: u32) -> Result<Self, ConfigError> {
        let mut url = Url::parse("postgres://localhost/").map_err(invalid_db_host)?;
        url.set_host(Some(&parts.host)).map_err(invalid_db_host)?;
        url.set_port(Some(parts.port))
            .map_err(|()| invalid_db_host("port cannot be set"))?;
        url.set_username(&parts.user)
            .map_err(|()| invalid_db_host("user cannot be set"))?;
        url.set_password(Some(parts.password.as_str()))
            .map_err(|()| invalid_db_host("password cannot be set"))?;
        url.path_segments_mut()
            .map_err(|()| invalid_db_host("database name cannot be set"))?
            .pop_if_empty()
            .push(&parts.name);
        url.query_pairs_mut().append_pair("sslmode", &parts.ssl_mode);

        Ok(Self {
            host: parts.host,
            port: parts.port,
            user: parts.user,
            name: parts.name,
            ssl_mode: parts.ssl_mode,
            pool_size,
            url: Zeroizing::new(url.into()),
        })
    }

    /// The `postgres://` connection URL.
    ///
    /// The URL embeds the password; never log it.
    pub fn url(&self) -> Zeroizing<String> {
        self.url.clone()
    }

    /// Maximum pooled connections.
    pub fn pool_size(&self) -> u32 {
        self.pool_size
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

/// Validated configuration consumed by `main`.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub bind_addr: SocketAddr,
    pub database: DatabaseSettings,
    pub jwt_secret: Zeroizing<String>,
    pub cookie_secure: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("bind_addr", &self.bind_addr)
            .field("database", &self.database)
            .field("jwt_secret", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}
