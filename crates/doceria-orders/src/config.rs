//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Order service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,

    /// Origins allowed to call the API (comma-separated in the environment)
    pub allowed_origins: Vec<String>,

    /// Origin tag stamped on orders that arrive without one
    pub default_order_origin: String,

    /// Cap on list endpoints when the caller does not pass a limit
    pub default_page_size: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AppConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| {
                    "http://localhost:5173,http://localhost:3000".to_string()
                })
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),

            default_order_origin: env::var("DEFAULT_ORDER_ORIGIN")
                .unwrap_or_else(|_| "site".to_string()),

            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_PAGE_SIZE".to_string()))?,
        };

        if config.allowed_origins.is_empty() {
            return Err(ConfigError::MissingRequired("ALLOWED_ORIGINS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
