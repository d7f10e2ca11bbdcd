//! Database configuration and connection pool construction.

use crate::postgres::PgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const ENV_DATABASE_URL: &str = "TASKLEDGER_DATABASE_URL";

/// Environment variable overriding the pool size.
pub const ENV_MAX_CONNECTIONS: &str = "TASKLEDGER_DB_MAX_CONNECTIONS";

/// Environment variable overriding the lock wait, in milliseconds.
pub const ENV_LOCK_TIMEOUT_MS: &str = "TASKLEDGER_LOCK_TIMEOUT_MS";

const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Lock wait, in milliseconds, applied when no override is configured.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A setting could not be parsed.
    #[error("{name} has invalid value '{value}'")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Rejected raw value.
        value: String,
    },

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Connection settings for the `PostgreSQL` adapters.
///
/// Deserialized values go through the same checks as environment overrides:
/// a blank URL or a zero pool size or lock wait is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawDatabaseConfig")]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Largest number of pooled connections.
    pub max_connections: u32,
    /// How long a unit of work waits for a counter row lock before failing.
    pub lock_timeout_ms: u64,
}

/// Unchecked wire form of [`DatabaseConfig`].
#[derive(Deserialize)]
struct RawDatabaseConfig {
    url: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default = "default_lock_timeout_ms")]
    lock_timeout_ms: u64,
}

impl TryFrom<RawDatabaseConfig> for DatabaseConfig {
    type Error = ConfigError;

    fn try_from(raw: RawDatabaseConfig) -> Result<Self, Self::Error> {
        let config = Self {
            url: raw.url,
            max_connections: raw.max_connections,
            lock_timeout_ms: raw.lock_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

impl DatabaseConfig {
    /// Creates a configuration for `url` with default pool size and lock
    /// wait.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the URL is unset and
    /// [`ConfigError::Invalid`] when a numeric override does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the URL is unset and
    /// [`ConfigError::Invalid`] when a numeric override does not parse or is
    /// zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let url = read(ENV_DATABASE_URL).ok_or(ConfigError::Missing(ENV_DATABASE_URL))?;
        let mut config = Self::new(url.trim());
        if let Some(raw) = read(ENV_MAX_CONNECTIONS) {
            config.max_connections = parse_positive(ENV_MAX_CONNECTIONS, &raw)?;
        }
        if let Some(raw) = read(ENV_LOCK_TIMEOUT_MS) {
            config.lock_timeout_ms = parse_positive(ENV_LOCK_TIMEOUT_MS, &raw)?;
        }
        Ok(config)
    }

    /// Checks that the URL is present and that the pool size and lock wait
    /// are positive. A zero lock wait would disable `lock_timeout` entirely.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for a blank URL and
    /// [`ConfigError::Invalid`] for a zero pool size or lock wait.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Missing("url"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "max_connections",
                value: self.max_connections.to_string(),
            });
        }
        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "lock_timeout_ms",
                value: self.lock_timeout_ms.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the lock wait as a [`Duration`].
    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Builds an r2d2 connection pool for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot open its initial
    /// connections.
    pub fn build_pool(&self) -> Result<PgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.url);
        let pool = Pool::builder()
            .max_size(self.max_connections)
            .build(manager)?;
        Ok(pool)
    }
}

fn parse_positive<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let invalid = || ConfigError::Invalid {
        name,
        value: raw.to_owned(),
    };
    let value: T = raw.trim().parse().map_err(|_| invalid())?;
    if value == T::default() {
        return Err(invalid());
    }
    Ok(value)
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

const fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}
