//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigValidationError;

/// Where session snapshots and final results are kept
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// PostgreSQL connection URL, required for the postgres backend
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply pending migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl StorageConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match self.backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::File => {
                if self.data_dir.as_os_str().is_empty() {
                    return Err(ConfigValidationError::MissingRequired("SURVEY__STORAGE__DATA_DIR"));
                }
                Ok(())
            }
            StorageBackend::Postgres => self.validate_postgres(),
        }
    }

    fn validate_postgres(&self) -> Result<(), ConfigValidationError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(ConfigValidationError::MissingRequired("SURVEY__STORAGE__DATABASE_URL"))?;
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ConfigValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigValidationError::InvalidPoolSize);
        }
        if self.max_connections > 100 {
            return Err(ConfigValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            database_url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/survey")
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_run_migrations() -> bool {
    true
}
