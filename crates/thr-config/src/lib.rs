//! # thr-config
//!
//! Layered configuration loading for Threshold using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`THRESHOLD_*` prefix, `__` as separator)
//! 2. Project-level `.threshold/config.toml`
//! 3. User-level `~/.config/threshold/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `THRESHOLD_HINTS__TTL_SECS` -> `hints.ttl_secs`,
//! `THRESHOLD_DATABASE__PATH` -> `database.path`, etc.
//!
//! ```no_run
//! use thr_config::ThresholdConfig;
//!
//! let config = ThresholdConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod hints;
mod session;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use hints::HintConfig;
pub use session::{SessionConfig, TokenConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub hints: HintConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
}

impl ThresholdConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or layer more providers.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".threshold/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("THRESHOLD_").split("__"))
    }

    /// Reject values that extract fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `database.path` is blank and
    /// `ConfigError::InvalidValue` naming the offending field otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "database".into(),
            });
        }
        if self.hints.dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hints.dir".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.tokens.default_ttl_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tokens.default_ttl_hours".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("threshold").join("config.toml"))
    }
}
