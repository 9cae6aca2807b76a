//! Catalog configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use menu_db::DbConfig;

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// SQLite file path (`:memory:` allowed)
    pub database_path: String,

    /// Connection pool size
    pub max_connections: u32,

    /// Pool acquire timeout in seconds
    pub connect_timeout_secs: u64,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            database_path: "./menu.db".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CatalogConfig::default();

        let config = CatalogConfig {
            database_path: lookup("MENU_DATABASE_PATH").unwrap_or(defaults.database_path),

            max_connections: match lookup("MENU_DB_MAX_CONNECTIONS") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("MENU_DB_MAX_CONNECTIONS".to_string()))?,
                None => defaults.max_connections,
            },

            connect_timeout_secs: match lookup("MENU_DB_CONNECT_TIMEOUT_SECS") {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue("MENU_DB_CONNECT_TIMEOUT_SECS".to_string())
                })?,
                None => defaults.connect_timeout_secs,
            },

            log_level: lookup("MENU_LOG").unwrap_or(defaults.log_level),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MENU_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pool settings for [`menu_db::Database::new`].
    ///
    /// An in-memory database is private to its connection, so it always
    /// gets a single-connection pool.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
