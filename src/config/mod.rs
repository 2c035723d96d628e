//! Configuration loading and management
//!
//! Configuration is resolved once at startup and passed down explicitly:
//! the admin secret goes into [`AdminGate`](crate::core::AdminGate), the
//! database section into the store constructor.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use validator::Validate;

/// Environment variable naming an optional YAML config file
pub const CONFIG_PATH_ENV: &str = "INVOICE_VERIFY_CONFIG";

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection descriptor and pool bounds for the record store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL. When absent the in-memory store is used.
    pub url: Option<String>,

    #[validate(range(min = 1, max = 1000))]
    pub max_connections: u32,

    #[validate(range(min = 1))]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

/// The shared admin secret
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminConfig {
    #[validate(length(min = 1, message = "admin key must not be empty"))]
    pub key: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig").field("key", &"<redacted>").finish()
    }
}

/// Bounds for the verification-log listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LogConfig {
    #[validate(range(min = 1))]
    pub default_limit: u32,

    #[validate(range(min = 1))]
    pub max_limit: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

impl LogConfig {
    /// Resolve a requested limit: default when absent, clamped to `1..=max_limit`
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub admin: AdminConfig,

    #[serde(default)]
    #[validate(nested)]
    pub logs: LogConfig,
}

impl AppConfig {
    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from the file named by `INVOICE_VERIFY_CONFIG` (if set), then
    /// apply `HOST`, `PORT`, `DATABASE_URL`, `DB_MAX_CONNECTIONS` and
    /// `ADMIN_KEY` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let content =
                    std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
                        path: path.clone(),
                    })?;
                serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    message: e.to_string(),
                })?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(key) = lookup("ADMIN_KEY") {
            self.admin.key = key;
        }
        Ok(())
    }

    /// Field-level validation plus cross-field rules
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.logs.default_limit > self.logs.max_limit {
            return Err(ConfigError::InvalidValue {
                field: "logs.default_limit".to_string(),
                message: format!("must not exceed logs.max_limit ({})", self.logs.max_limit),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: key.to_string(),
        message: e.to_string(),
    })
}
