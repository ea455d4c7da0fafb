//! Configuration loading and management

use crate::core::transition::StatusPolicy;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unknown environment '{}' (expected 'development' or 'production')",
                other
            )),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

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

impl ServerConfig {
    /// `host:port` to bind; hostnames are resolved by the listener
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Page size settings for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when `limit` is absent or unparsable
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Upper bound applied to any requested `limit`
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u64 {
    10
}

fn default_max_limit() -> u64 {
    100
}

/// Which persistence backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Mongodb,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in_memory" => Ok(StorageBackend::InMemory),
            "mongodb" => Ok(StorageBackend::Mongodb),
            other => Err(anyhow!(
                "unknown storage backend '{}' (expected 'in_memory' or 'mongodb')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Connection string, used by the MongoDB backend
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            uri: default_uri(),
            database: default_database(),
        }
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "requests".to_string()
}

/// Complete configuration for the request tracker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Gate applied before every status change
    #[serde(default)]
    pub status_policy: StatusPolicy,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Override fields from process environment variables
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from a variable lookup
    ///
    /// Recognized keys: `APP_ENV`, `STATUS_POLICY`, `HOST`, `PORT`,
    /// `STORAGE_BACKEND`, `MONGODB_URI`, `MONGODB_DATABASE`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("APP_ENV") {
            self.environment = value.parse()?;
        }
        if let Some(value) = lookup("STATUS_POLICY") {
            self.status_policy = value.parse()?;
        }
        if let Some(value) = lookup("HOST") {
            self.server.host = value;
        }
        if let Some(value) = lookup("PORT") {
            self.server.port = value
                .parse()
                .with_context(|| format!("invalid PORT '{}'", value))?;
        }
        if let Some(value) = lookup("STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        if let Some(value) = lookup("MONGODB_URI") {
            self.storage.uri = value;
        }
        if let Some(value) = lookup("MONGODB_DATABASE") {
            self.storage.database = value;
        }
        Ok(self)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Whether 500 responses may carry the underlying error message
    pub fn expose_internal_errors(&self) -> bool {
        !self.is_production()
    }
}
