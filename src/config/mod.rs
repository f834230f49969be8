//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SURVEY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use workflow_survey::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}:{}", config.server.host, config.server.port);
//! ```

mod ai;
mod error;
mod features;
mod server;
mod storage;

pub use ai::{AiConfig, GeneratorKind};
pub use error::{ConfigError, ConfigValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads. Whether it
/// validates depends on the generator and storage backend chosen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Content generator configuration (OpenAI or mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Session and result storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SURVEY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SURVEY__STORAGE__BACKEND=postgres` -> `storage.backend = postgres`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("SURVEY").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
