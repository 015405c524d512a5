//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Service configuration, read from the environment with sensible defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port for the REST server.
    pub port: u16,
    /// Path of the libSQL database file.
    pub db_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from("./data/menoguide.db"),
        }
    }
}

impl AppConfig {
    /// Read configuration from `MENOGUIDE_PORT` and `MENOGUIDE_DB_PATH`.
    ///
    /// Unset variables fall back to defaults; a present-but-invalid value is
    /// an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("MENOGUIDE_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MENOGUIDE_PORT".to_string(),
                message: format!("not a port number: {raw}"),
            })?,
            Err(_) => defaults.port,
        };

        let db_path = std::env::var("MENOGUIDE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        Ok(Self { port, db_path })
    }
}
