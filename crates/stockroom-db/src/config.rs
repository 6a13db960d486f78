//! Ledger configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `STOCKROOM_DB_PATH` | `stockroom.db` |
//! | `STOCKROOM_MAX_CONNECTIONS` | `5` |
//! | `STOCKROOM_BUSY_TIMEOUT_SECS` | `5` |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "STOCKROOM_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "STOCKROOM_MAX_CONNECTIONS";
pub const ENV_BUSY_TIMEOUT_SECS: &str = "STOCKROOM_BUSY_TIMEOUT_SECS";

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Write-lock wait in seconds
    pub busy_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            database_path: PathBuf::from("stockroom.db"),
            max_connections: 5,
            busy_timeout_secs: 5,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LedgerConfig::default();

        let database_path = lookup(ENV_DB_PATH)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let max_connections: u32 = match lookup(ENV_MAX_CONNECTIONS) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()))?,
            None => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()));
        }

        let busy_timeout_secs = match lookup(ENV_BUSY_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_BUSY_TIMEOUT_SECS.to_string()))?,
            None => defaults.busy_timeout_secs,
        };

        Ok(LedgerConfig {
            database_path,
            max_connections,
            busy_timeout_secs,
        })
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/data/ledger.db"),
            (ENV_MAX_CONNECTIONS, "12"),
            (ENV_BUSY_TIMEOUT_SECS, " 30 "),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/ledger.db"));
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.db_config().busy_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values() {
        assert!(LedgerConfig::from_lookup(lookup(&[(ENV_MAX_CONNECTIONS, "many")])).is_err());
        assert!(LedgerConfig::from_lookup(lookup(&[(ENV_MAX_CONNECTIONS, "0")])).is_err());
        assert!(LedgerConfig::from_lookup(lookup(&[(ENV_BUSY_TIMEOUT_SECS, "-1")])).is_err());
    }
}
