//! Configuration management for the weight tracker
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// JWT signing and cookie settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for access tokens and one-off purpose tokens
    pub sign_key: String,
    /// Secret for refresh tokens
    pub refresh_sign_key: String,
    /// Issuer and audience string
    pub issuer: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    pub access_cookie: String,
    pub refresh_cookie: String,
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    /// Trusted proxy header carrying the real client address
    pub client_header: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    pub jwt: JwtConfig,

    pub rate_limit: RateLimitConfig,

    /// Key guarding the health endpoint
    pub api_key: Option<String>,

    /// Frontend base URL used for links in notifications
    pub base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = required("DATABASE_URL")?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = parsed_or("DB_MAX_CONNECTIONS", 5)?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("LOG_LEVEL")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let jwt = JwtConfig {
            sign_key: required("JWT_SIGN_KEY")?,
            refresh_sign_key: required("JWT_REFRESH_SIGN_KEY")?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "weight-tracker".to_string()),
            access_ttl_minutes: parsed_or("JWT_EXPIRE_MINUTES", 15)?,
            refresh_ttl_minutes: parsed_or("JWT_REFRESH_EXPIRE_MINUTES", 7 * 24 * 60)?,
            access_cookie: env::var("ACCESS_TOKEN_COOKIE")
                .unwrap_or_else(|_| "X-wt-token".to_string()),
            refresh_cookie: env::var("REFRESH_TOKEN_COOKIE")
                .unwrap_or_else(|_| "X-wt-refresh".to_string()),
        };

        let rate_limit = RateLimitConfig {
            window: Duration::from_secs(parsed_or("RATE_LIMIT_WINDOW_SECONDS", 60)?),
            max_requests: parsed_or("RATE_LIMIT_MAX_REQUESTS", 500)?,
            client_header: env::var("RATE_LIMIT_CLIENT_HEADER")
                .unwrap_or_else(|_| "X-Real-IP".to_string()),
        };

        let api_key = env::var("API_KEY").ok().filter(|k| !k.is_empty());

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        Ok(Config {
            database_url,
            environment,
            port,
            db_max_connections,
            cors_allowed_origins,
            log_level,
            jwt,
            rate_limit,
            api_key,
            base_url,
        })
    }

    /// Get database URL with the password masked, for logging
    pub fn database_url_masked(&self) -> String {
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(format!("{} has invalid value '{}'", key, raw)))
}
