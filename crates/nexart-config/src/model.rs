//! Typed endpoint and runtime settings.
//!
//! Endpoint types are the validated form of caller-supplied arguments: every
//! surface (HTTP handlers, CLI flags) parses raw strings into these before any
//! upstream call is made.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_STAGING_DIR_NAME,
};
use crate::error::ConfigResult;
use crate::validate::{parse_base_url, require_present};

/// Source repository manager endpoint with basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct NexusEndpoint {
    /// Base URL of the Nexus instance (context path included).
    pub base_url: Url,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
}

impl NexusEndpoint {
    /// Validate raw endpoint arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or a credential is blank.
    pub fn parse(url: &str, username: &str, password: &str) -> ConfigResult<Self> {
        Ok(Self {
            base_url: parse_base_url("nexus", "url", url)?,
            username: require_present("nexus", "username", username)?,
            password: require_present("nexus", "password", password)?,
        })
    }
}

impl fmt::Debug for NexusEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NexusEndpoint")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential presented to the destination repository manager.
#[derive(Clone, PartialEq, Eq)]
pub enum DestinationAuth {
    /// Legacy API key sent as `X-JFrog-Art-Api`.
    ApiKey(String),
    /// Access token sent as `Authorization: Bearer`.
    Bearer(String),
}

impl DestinationAuth {
    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::Bearer(_) => "bearer",
        }
    }
}

impl fmt::Debug for DestinationAuth {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "DestinationAuth::{}(<redacted>)", self.kind())
    }
}

/// Destination repository manager endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactoryEndpoint {
    /// Base URL of the Artifactory host (without the `/artifactory` suffix).
    pub base_url: Url,
    /// Credential attached to every request.
    pub auth: DestinationAuth,
}

impl ArtifactoryEndpoint {
    /// Validate an endpoint authenticated with an API key.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the key is blank.
    pub fn with_api_key(url: &str, api_key: &str) -> ConfigResult<Self> {
        Ok(Self {
            base_url: parse_base_url("artifactory", "url", url)?,
            auth: DestinationAuth::ApiKey(require_present("artifactory", "api_key", api_key)?),
        })
    }

    /// Validate an endpoint authenticated with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the token is blank.
    pub fn with_bearer(url: &str, token: &str) -> ConfigResult<Self> {
        Ok(Self {
            base_url: parse_base_url("artifactory", "url", url)?,
            auth: DestinationAuth::Bearer(require_present("artifactory", "api_token", token)?),
        })
    }
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Upper bound for every upstream request.
    pub timeout: Duration,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            accept_invalid_certs: false,
        }
    }
}

/// Location of the transient staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingSettings {
    /// Directory under which each run creates its own staging root.
    pub root: PathBuf,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join(DEFAULT_STAGING_DIR_NAME),
        }
    }
}

/// Migration pipeline tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSettings {
    /// Transfers allowed in flight within a single repository.
    pub concurrency: NonZeroUsize,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            concurrency: NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Log output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOutput {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl LogOutput {
    /// Parse a format name, returning `None` for unknown values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Logging settings handed to the telemetry crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level filter applied when `RUST_LOG` is unset.
    pub level: String,
    /// Explicit output format; the build profile decides when `None`.
    pub format: Option<LogOutput>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: None,
        }
    }
}
