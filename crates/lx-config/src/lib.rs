//! # lx-config
//!
//! Layered configuration loading for Lifex using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LIFEX_*` prefix, `__` as separator)
//! 2. Project-level `.lifex/config.toml`
//! 3. User-level `~/.config/lifex/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LIFEX_SERVER__PORT` -> `server.port`,
//! `LIFEX_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lx_config::LxConfig;
//!
//! let config = LxConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_address());
//! ```

mod database;
mod error;
mod general;
mod predictor;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use predictor::PredictorConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "LIFEX_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LxConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LxConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`LxConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lifex/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that would only fail later at bind/open time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".into(),
                reason: "port must be non-zero".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "path must not be empty".into(),
            });
        }
        if self.general.audit_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.audit_limit".into(),
                reason: "limit must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lifex").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available), then falls back to the
    /// current directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
