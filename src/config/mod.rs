pub mod app_conf;
pub mod database_conf;

pub use app_conf::AppConfig;
pub use database_conf::DatabaseConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
