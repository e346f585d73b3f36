//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `BEATSTACK`
//! prefix; nested sections use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use beatstack::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod currency;
mod database;
mod error;
mod payment;
mod server;
mod storage;

pub use auth::AuthConfig;
pub use currency::CurrencyConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Identity provider configuration (Firebase)
    #[serde(default)]
    pub auth: AuthConfig,

    /// Payment gateway configuration (Paystack)
    pub payment: PaymentConfig,

    /// Currency rate service configuration
    #[serde(default)]
    pub currency: CurrencyConfig,

    /// Object storage configuration (contract documents)
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variable Format
    ///
    /// - `BEATSTACK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BEATSTACK__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// A `.env` file is loaded first when present (development).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BEATSTACK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.currency.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
