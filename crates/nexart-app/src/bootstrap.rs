use std::future::Future;

use nexart_api::ApiServer;
use nexart_config::{AppConfig, LogOutput, LoggingSettings};
use nexart_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the migration service.
pub(crate) struct BootstrapDependencies {
    config: AppConfig,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config = AppConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        Self::new(config)
    }

    pub(crate) fn new(config: AppConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self { config, telemetry })
    }
}

/// Entry point for the service boot sequence.
///
/// # Errors
///
/// Returns an error if configuration loading, telemetry setup, or serving fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies, shutdown_signal()).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with<F>(
    dependencies: BootstrapDependencies,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies { config, telemetry } = dependencies;
    nexart_telemetry::init_logging(&logging_config(&config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");

    info!(
        bind_addr = %config.bind_addr,
        staging_root = %config.staging.root.display(),
        concurrency = config.migration.concurrency.get(),
        timeout_secs = config.http.timeout.as_secs(),
        "migration service bootstrap starting"
    );

    let api = ApiServer::new(&config, telemetry)
        .map_err(|err| AppError::api_server("api_server.new", err))?;
    api.serve(config.bind_addr, shutdown)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn logging_config(settings: &LoggingSettings) -> LoggingConfig<'_> {
    let format = settings.format.map_or_else(LogFormat::infer, |format| match format {
        LogOutput::Json => LogFormat::Json,
        LogOutput::Pretty => LogFormat::Pretty,
    });
    LoggingConfig {
        level: &settings.level,
        format,
        ..LoggingConfig::default()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable; serving until terminated");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn logging_config_follows_settings() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            format: Some(LogOutput::Json),
        };
        let config = logging_config(&settings);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);

        let inferred_settings = LoggingSettings {
            level: "info".to_string(),
            format: None,
        };
        let inferred = logging_config(&inferred_settings);
        assert_eq!(inferred.format, LogFormat::infer());
    }

    #[tokio::test]
    async fn run_app_with_serves_until_shutdown() -> anyhow::Result<()> {
        let staging = TempDir::new()?;
        let root = staging.path().to_string_lossy().into_owned();
        let config = AppConfig::from_lookup(|name| match name {
            "NEXART_BIND_ADDR" => Some("127.0.0.1:0".to_string()),
            "NEXART_STAGING_ROOT" => Some(root.clone()),
            _ => None,
        })?;
        let dependencies = BootstrapDependencies::new(config)?;
        run_app_with(dependencies, async {}).await?;
        Ok(())
    }
}
