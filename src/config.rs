use std::{env, net::IpAddr, str::FromStr, time::Duration};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::{errors::ConfigError, models::MAX_EXPIRY_HOURS, store::StoreBackend};

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
    /// Public base of generated short URLs, e.g. `http://localhost:3000`
    pub domain: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

// Implement FromStr trait for Environment enum to enable parsing from string
impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

// Result type for configuration functions
type ConfigResult<T> = Result<T, ConfigError>;

// Key-value store config
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub addr: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per client and window
    pub quota: i64,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    pub default_expiry_hours: u64,
}

// Config struct that matches our environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub store: StoreConfig,
    pub rate_limit: RateLimitConfig,
    pub shortener: ShortenerConfig,
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        // Load .env file if it exists
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port: get_env_or_default("APP_PORT", "3000")?,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
        };

        // Get version from Cargo.toml or environment
        let version = option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string();

        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "linkquota")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
            domain: get_env_or_default("DOMAIN", "http://localhost:3000")?,
        };

        let password: String = get_env_or_default("DB_PASS", "")?;
        let store = StoreConfig {
            backend: get_env_or_default("STORE_BACKEND", "redis")?,
            addr: get_env_or_default("DB_ADDR", "localhost:6379")?,
            password: Some(password).filter(|p| !p.is_empty()),
        };

        let quota: i64 = get_env_or_default("API_QUOTA", "20")?;
        let window_minutes: u64 = get_env_or_default("RATE_LIMIT_MINUTES", "30")?;
        let default_expiry_hours: u64 = get_env_or_default("DEFAULT_EXPIRY_HOURS", "24")?;
        check_limits(quota, window_minutes, default_expiry_hours)?;

        let rate_limit = RateLimitConfig {
            quota,
            window: Duration::from_secs(window_minutes * 60),
        };
        let shortener = ShortenerConfig {
            default_expiry_hours,
        };

        let config = Config {
            server,
            app,
            store,
            rate_limit,
            shortener,
        };
        info!("Configuration loaded successfully");

        Ok(config)
    }
}

fn check_limits(quota: i64, window_minutes: u64, default_expiry_hours: u64) -> ConfigResult<()> {
    if quota <= 0 {
        return Err(ConfigError::OutOfRange("API_QUOTA must be positive".to_string()));
    }
    if window_minutes == 0 || window_minutes.checked_mul(60).is_none() {
        return Err(ConfigError::OutOfRange(
            "RATE_LIMIT_MINUTES must be a positive number of minutes".to_string(),
        ));
    }
    if default_expiry_hours == 0 || default_expiry_hours > MAX_EXPIRY_HOURS {
        return Err(ConfigError::OutOfRange(format!(
            "DEFAULT_EXPIRY_HOURS must be between 1 and {}",
            MAX_EXPIRY_HOURS
        )));
    }
    Ok(())
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}
