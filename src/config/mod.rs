//! Configuration management
//!
//! Configuration is loaded from a YAML file (`config.yml` by default, or the
//! path in `NEWSPORTAL_CONFIG`) and then overridden by environment variables.
//! Missing values are filled with defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the config file path
pub const CONFIG_PATH_ENV: &str = "NEWSPORTAL_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Pagination defaults for list endpoints
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8075
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "data/newsportal.db".to_string()
}

fn default_max_connections() -> u32 {
    20
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Default page sizes, one per call site family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size for the public portal news feed
    #[serde(default = "default_portal_page_size")]
    pub portal_page_size: u32,
    /// Page size for admin `get` lists
    #[serde(default = "default_admin_page_size")]
    pub admin_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            portal_page_size: default_portal_page_size(),
            admin_page_size: default_admin_page_size(),
        }
    }
}

fn default_portal_page_size() -> u32 {
    2
}

fn default_admin_page_size() -> u32 {
    25
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Log every SQL statement issued by sqlx
    #[serde(default)]
    pub sql: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            sql: false,
        }
    }
}

fn default_log_filter() -> String {
    "newsportal=info,tower_http=info".to_string()
}

impl LoggingConfig {
    /// Filter directives with the sqlx statement logger switched on or off.
    pub fn directives(&self) -> String {
        if self.sql {
            format!("{},sqlx=info", self.filter)
        } else {
            format!("{},sqlx=warn", self.filter)
        }
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Config file path from `NEWSPORTAL_CONFIG`, falling back to `config.yml`.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yml"))
    }

    /// Load configuration from file.
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, then apply environment overrides:
    ///
    /// - NEWSPORTAL_SERVER_HOST
    /// - NEWSPORTAL_SERVER_PORT
    /// - NEWSPORTAL_DATABASE_DRIVER
    /// - NEWSPORTAL_DATABASE_URL
    /// - NEWSPORTAL_DATABASE_MAX_CONNECTIONS
    /// - NEWSPORTAL_LOG
    /// - NEWSPORTAL_LOG_SQL
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NEWSPORTAL_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NEWSPORTAL_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(driver) = std::env::var("NEWSPORTAL_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("NEWSPORTAL_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(max) = std::env::var("NEWSPORTAL_DATABASE_MAX_CONNECTIONS") {
            if let Ok(max) = max.parse::<u32>() {
                self.database.max_connections = max;
            }
        }

        if let Ok(filter) = std::env::var("NEWSPORTAL_LOG") {
            self.logging.filter = filter;
        }
        if let Ok(sql) = std::env::var("NEWSPORTAL_LOG_SQL") {
            self.logging.sql = matches!(sql.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.portal_page_size == 0 || self.pagination.admin_page_size == 0 {
            return Err(ConfigError::ValidationError(
                "pagination page sizes must be positive".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Serialises tests that touch process environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
