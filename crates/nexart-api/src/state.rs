//! Shared state handed to every handler.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use nexart_config::AppConfig;
use nexart_core::{MigrationResult, build_http_client};
use nexart_telemetry::Metrics;
use reqwest::Client;

pub(crate) struct ApiState {
    pub(crate) client: Client,
    pub(crate) staging_root: PathBuf,
    pub(crate) concurrency: NonZeroUsize,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) fn from_config(config: &AppConfig, telemetry: Metrics) -> MigrationResult<Self> {
        Ok(Self {
            client: build_http_client(&config.http)?,
            staging_root: config.staging.root.clone(),
            concurrency: config.migration.concurrency,
            telemetry,
        })
    }
}
