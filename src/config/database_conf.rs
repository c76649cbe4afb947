use std::env;
use std::path::PathBuf;

use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var("DATABASE_PATH").unwrap_or_else(|_| "users.db".to_string());

        // One connection serializes all statements through a single storage handle.
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::ParseError(format!("invalid DATABASE_MAX_CONNECTIONS: {raw}")))?,
            Err(_) => 1,
        };
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(DatabaseConfig {
            path: PathBuf::from(path),
            max_connections,
        })
    }
}
