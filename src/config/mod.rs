use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// GST rate applied when a product has no rate of its own
    pub default_gst_rate: Decimal,
    /// Trailing window, in days, for the analytics endpoints
    pub analytics_window_days: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub api_key_secret: String,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                default_gst_rate: Decimal::from_str(
                    &env::var("DEFAULT_GST_RATE").unwrap_or_else(|_| "18".to_string()),
                )
                .map_err(|_| AppError::Configuration("Invalid DEFAULT_GST_RATE".to_string()))?,
                analytics_window_days: env::var("ANALYTICS_WINDOW_DAYS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid ANALYTICS_WINDOW_DAYS".to_string())
                    })?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            security: SecurityConfig {
                api_key_secret: env::var("API_KEY_SECRET")
                    .map_err(|_| AppError::Configuration("API_KEY_SECRET not set".to_string()))?,
                cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.default_gst_rate < Decimal::ZERO {
            return Err(AppError::Configuration(
                "Default GST rate cannot be negative".to_string(),
            ));
        }

        if self.app.analytics_window_days == 0 {
            return Err(AppError::Configuration(
                "Analytics window must be at least one day".to_string(),
            ));
        }

        if self.security.api_key_secret.len() < 16 {
            return Err(AppError::Configuration(
                "API_KEY_SECRET must be at least 16 characters".to_string(),
            ));
        }

        Ok(())
    }
}
