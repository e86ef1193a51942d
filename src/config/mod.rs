//! Application configuration module
//!
//! Configuration is read from environment variables with the `RECORD_INTAKE`
//! prefix; nested values are separated by `__`. A `.env` file is honoured in
//! development.
//!
//! # Example
//!
//! ```no_run
//! use record_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod intake;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use intake::IntakeConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Absent means in-memory record sink and catalog
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub intake: IntakeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `RECORD_INTAKE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RECORD_INTAKE__DATABASE__URL=...` -> `database.url = ...`
    /// - `RECORD_INTAKE__INTAKE__TRANSCRIPT_DIR=...` -> `intake.transcript_dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RECORD_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation, separate from loading.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.intake.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
