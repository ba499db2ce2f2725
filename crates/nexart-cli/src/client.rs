//! Shared client utilities, error types, and logging wiring for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use nexart_config::{HttpSettings, StagingSettings};
use nexart_core::{PassThrough, build_http_client};
use nexart_telemetry::{LogFormat, LogTarget, LoggingConfig, init_logging};
use reqwest::Client;

use crate::cli::Cli;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Shared state for every command: the HTTP client and the staging root.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) staging_root: PathBuf,
}

impl AppContext {
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        if cli.timeout == 0 {
            return Err(CliError::validation("--timeout must be greater than zero"));
        }
        let settings = HttpSettings {
            timeout: Duration::from_secs(cli.timeout),
            accept_invalid_certs: cli.insecure,
        };
        let client = build_http_client(&settings).map_err(CliError::failure)?;
        let staging_root = cli
            .staging_root
            .clone()
            .unwrap_or_else(|| StagingSettings::default().root);
        Ok(Self {
            client,
            staging_root,
        })
    }
}

/// Pretty diagnostics on stderr; stdout is reserved for rendered output.
pub(crate) fn logging_config(level: &str) -> LoggingConfig<'_> {
    LoggingConfig {
        level,
        format: LogFormat::Pretty,
        target: LogTarget::Stderr,
        ..LoggingConfig::default()
    }
}

pub(crate) fn install_logging(level: &str) -> CliResult<()> {
    init_logging(&logging_config(level)).map_err(CliError::failure)
}

/// Turn an upstream status of 400 or above into a command failure.
pub(crate) fn ensure_upstream_success(operation: &str, outcome: &PassThrough) -> CliResult<()> {
    if outcome.status_code >= 400 {
        return Err(CliError::failure(anyhow!(
            "{operation} returned HTTP {}",
            outcome.status_code
        )));
    }
    Ok(())
}
