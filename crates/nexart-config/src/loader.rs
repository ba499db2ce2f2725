//! Environment-driven application configuration.
//!
//! # Design
//! - `from_env` reads the process environment; `from_lookup` accepts any
//!   key lookup so tests never mutate global state.
//! - Every value falls back to a documented default in `defaults.rs`.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::debug;

use crate::defaults::{DEFAULT_BIND_ADDR, env};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{HttpSettings, LogOutput, LoggingSettings, MigrationSettings, StagingSettings};
use crate::validate::{parse_bind_addr, parse_flag, parse_positive, parse_timeout_secs};

/// Runtime configuration for the migration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listener address for the HTTP API.
    pub bind_addr: SocketAddr,
    /// Outbound HTTP client settings.
    pub http: HttpSettings,
    /// Staging area location.
    pub staging: StagingSettings,
    /// Pipeline tuning.
    pub migration: MigrationSettings,
    /// Logging preferences.
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when any variable is present but invalid.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when any value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = parse_bind_addr(
            "api",
            "bind_addr",
            read(env::BIND_ADDR).as_deref().unwrap_or(DEFAULT_BIND_ADDR),
        )?;

        let mut http = HttpSettings::default();
        if let Some(raw) = read(env::HTTP_TIMEOUT_SECS) {
            http.timeout = parse_timeout_secs("http", "timeout_secs", &raw)?;
        }
        if let Some(raw) = read(env::ACCEPT_INVALID_CERTS) {
            http.accept_invalid_certs = parse_flag("http", "accept_invalid_certs", &raw)?;
        }

        let staging = read(env::STAGING_ROOT).map_or_else(StagingSettings::default, |raw| {
            StagingSettings {
                root: PathBuf::from(raw.trim()),
            }
        });

        let mut migration = MigrationSettings::default();
        if let Some(raw) = read(env::CONCURRENCY) {
            migration.concurrency = parse_positive("migration", "concurrency", &raw)?;
        }

        let mut logging = LoggingSettings::default();
        if let Some(level) = read(env::LOG_LEVEL) {
            logging.level = level.trim().to_string();
        }
        if let Some(raw) = read(env::LOG_FORMAT) {
            logging.format = Some(LogOutput::parse(&raw).ok_or(ConfigError::InvalidField {
                section: "logging",
                field: "format",
                value: Some(raw),
                reason: "must be json or pretty",
            })?);
        }

        let config = Self {
            bind_addr,
            http,
            staging,
            migration,
            logging,
        };
        debug!(
            bind_addr = %config.bind_addr,
            staging_root = %config.staging.root.display(),
            concurrency = config.migration.concurrency.get(),
            "configuration loaded"
        );
        Ok(config)
    }
}
