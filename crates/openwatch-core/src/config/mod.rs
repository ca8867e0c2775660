//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default, so an empty configuration yields
//! an in-memory deployment with anchoring disabled.

pub mod database;
pub mod integrity;
pub mod logging;
pub mod records;

use serde::{Deserialize, Serialize};

pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::integrity::{AnchorConfig, IntegrityConfig};
pub use self::logging::LoggingConfig;
pub use self::records::{AuditConfig, RecordsConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Record store backend settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Record listing settings.
    #[serde(default)]
    pub records: RecordsConfig,
    /// Audit ledger settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// External integrity anchor settings.
    #[serde(default)]
    pub anchor: AnchorConfig,
    /// Fingerprinting behaviour.
    #[serde(default)]
    pub integrity: IntegrityConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `OPENWATCH__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("OPENWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML string.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
