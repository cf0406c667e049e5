//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use crate::error::AppError;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Which `BillStore` implementation backs the service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// One text file per customer
    Text,
    /// SQLite database
    Database,
}

/// Storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding per-customer text files (`text` backend)
    pub text_dir: Option<PathBuf>,

    /// SQLite connection URL (`database` backend)
    pub database_url: Option<String>,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl StorageConfig {
    /// Text directory, required for the `text` backend
    pub fn require_text_dir(&self) -> Result<&PathBuf, AppError> {
        self.text_dir
            .as_ref()
            .ok_or_else(|| AppError::Config("storage.text_dir is required for the text backend".to_string()))
    }

    /// Database URL, required for the `database` backend
    pub fn require_database_url(&self) -> Result<&str, AppError> {
        self.database_url.as_deref().ok_or_else(|| {
            AppError::Config("storage.database_url is required for the database backend".to_string())
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            text_dir: None,
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Self::builder()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with PHONEBILL_ prefix
            .add_source(
                Environment::with_prefix("PHONEBILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Self::builder()?
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("PHONEBILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.max_connections", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_is_memory() {
        let storage = StorageConfig::default();
        assert_eq!(storage.backend, StorageBackend::Memory);
        assert_eq!(storage.max_connections, 5);
    }

    #[test]
    fn test_required_settings_per_backend() {
        let storage = StorageConfig {
            backend: StorageBackend::Database,
            ..Default::default()
        };
        assert!(matches!(
            storage.require_database_url(),
            Err(AppError::Config(_))
        ));
        assert!(storage.require_text_dir().is_err());

        let storage = StorageConfig {
            backend: StorageBackend::Text,
            text_dir: Some(PathBuf::from("/tmp/bills")),
            ..Default::default()
        };
        assert_eq!(storage.require_text_dir().unwrap(), &PathBuf::from("/tmp/bills"));
    }

    #[test]
    fn test_from_file_reads_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"database\"\ndatabase_url = \"sqlite://bills.db\"\n[server]\nport = 9090\n",
        )
        .unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Database);
        assert_eq!(config.storage.require_database_url().unwrap(), "sqlite://bills.db");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.level, "info");
    }
}
