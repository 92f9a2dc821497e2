//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_LOG_FORMAT, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, rate_limits,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Identity token verification
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret of the identity provider (HS256)
    pub secret: String,
}

/// Administrator allow-list
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// Lowercased emails granted admin rights regardless of role claim
    pub emails: Vec<String>,
}

/// Fixed-window throttling limits: (max requests, window seconds)
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub picks: (i64, i64),
    pub admin: (i64, i64),
    pub general: (i64, i64),
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            picks: (
                rate_limits::PICKS_MAX_REQUESTS,
                rate_limits::PICKS_WINDOW_SECS,
            ),
            admin: (
                rate_limits::ADMIN_MAX_REQUESTS,
                rate_limits::ADMIN_WINDOW_SECS,
            ),
            general: (
                rate_limits::GENERAL_MAX_REQUESTS,
                rate_limits::GENERAL_WINDOW_SECS,
            ),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            admin: AdminConfig::from_env(),
            rate_limit: RateLimitConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let log_format =
            env::var("LOG_FORMAT").unwrap_or_else(|_| DEFAULT_LOG_FORMAT.to_string());
        if log_format != "pretty" && log_format != "json" {
            return Err(ConfigError::InvalidValue("LOG_FORMAT".to_string()));
        }

        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?;
        if secret.is_empty() {
            return Err(ConfigError::InvalidValue("JWT_SECRET".to_string()));
        }
        Ok(Self { secret })
    }
}

impl AdminConfig {
    fn from_env() -> Self {
        Self::parse(&env::var("ADMIN_EMAILS").unwrap_or_default())
    }

    /// Parse a comma-separated list of emails, lowercased and deduplicated
    pub fn parse(raw: &str) -> Self {
        let mut emails: Vec<String> = raw
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        emails.sort();
        emails.dedup();
        Self { emails }
    }

    /// Check whether an email is on the allow-list (case-insensitive)
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.emails.iter().any(|e| *e == email)
    }
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            picks: (
                parse_or("RATE_LIMIT_PICKS_MAX", defaults.picks.0)?,
                defaults.picks.1,
            ),
            admin: (
                parse_or("RATE_LIMIT_ADMIN_MAX", defaults.admin.0)?,
                defaults.admin.1,
            ),
            general: (
                parse_or("RATE_LIMIT_GENERAL_MAX", defaults.general.0)?,
                defaults.general.1,
            ),
        })
    }
}

fn parse_or(key: &str, default: i64) -> Result<i64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
