//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod enrollment;
pub mod logging;
pub mod notifier;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::{AuthConfig, CsrfConfig};
use self::cache::CacheConfig;
use self::database::DatabaseConfig;
use self::enrollment::EnrollmentConfig;
use self::logging::LoggingConfig;
use self::notifier::NotifierConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token signing and session settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// CSRF double-submit settings.
    #[serde(default)]
    pub csrf: CsrfConfig,
    /// Enrollment handshake settings.
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
    /// Outbound notification settings.
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ACCOUNT__`
    /// (e.g. `ACCOUNT__AUTH__ACCESS_TOKEN_SECRET`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ACCOUNT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run safely with.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.enrollment.validate()?;

        if self.database.provider == "postgres" && self.database.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres provider",
            ));
        }
        if self.notifier.provider == "http" && self.notifier.relay_url.trim().is_empty() {
            return Err(AppError::configuration(
                "notifier.relay_url is required for the http notifier",
            ));
        }
        Ok(())
    }
}
