//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the counters relevant to migration runs and the HTTP surface.

use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    migration_runs_total: IntCounter,
    repositories_provisioned_total: IntCounterVec,
    artifact_downloads_total: IntCounterVec,
    artifact_uploads_total: IntCounterVec,
    catalog_failures_total: IntCounterVec,
}

/// Snapshot of the migration counters for health reporting.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Completed migration runs.
    pub migration_runs_total: u64,
    /// Repositories newly created on the destination.
    pub repositories_created_total: u64,
    /// Repositories that already existed on the destination.
    pub repositories_existing_total: u64,
    /// Repositories whose provisioning failed.
    pub repositories_failed_total: u64,
    /// Artifacts downloaded and staged.
    pub downloads_succeeded_total: u64,
    /// Artifacts whose download failed.
    pub downloads_failed_total: u64,
    /// Artifacts accepted by the destination.
    pub uploads_succeeded_total: u64,
    /// Artifacts rejected by the destination or lost in transit.
    pub uploads_failed_total: u64,
    /// Catalog listings that could not be obtained.
    pub catalog_failures_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let migration_runs_total = IntCounter::with_opts(Opts::new(
            "migration_runs_total",
            "Completed migration runs",
        ))
        .map_err(|source| TelemetryError::Collector {
            name: "migration_runs_total",
            source,
        })?;
        let repositories_provisioned_total = counter_vec(
            "repositories_provisioned_total",
            "Destination repository provisioning attempts by outcome",
            &["outcome"],
        )?;
        let artifact_downloads_total = counter_vec(
            "artifact_downloads_total",
            "Artifact downloads from the source by status",
            &["status"],
        )?;
        let artifact_uploads_total = counter_vec(
            "artifact_uploads_total",
            "Artifact uploads to the destination by status",
            &["status"],
        )?;
        let catalog_failures_total = counter_vec(
            "catalog_failures_total",
            "Source catalog listings that could not be obtained",
            &["listing"],
        )?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "migration_runs_total", &migration_runs_total)?;
        register(
            &registry,
            "repositories_provisioned_total",
            &repositories_provisioned_total,
        )?;
        register(&registry, "artifact_downloads_total", &artifact_downloads_total)?;
        register(&registry, "artifact_uploads_total", &artifact_uploads_total)?;
        register(&registry, "catalog_failures_total", &catalog_failures_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                migration_runs_total,
                repositories_provisioned_total,
                artifact_downloads_total,
                artifact_uploads_total,
                catalog_failures_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Increment the completed run counter.
    pub fn inc_migration_run(&self) {
        self.inner.migration_runs_total.inc();
    }

    /// Record a provisioning outcome (`created`, `already_exists`, `failed`).
    pub fn inc_repository_provisioned(&self, outcome: &str) {
        self.inner
            .repositories_provisioned_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Record a download attempt (`success` or `failure`).
    pub fn inc_artifact_download(&self, status: &str) {
        self.inner
            .artifact_downloads_total
            .with_label_values(&[status])
            .inc();
    }

    /// Record an upload attempt (`success` or `failure`).
    pub fn inc_artifact_upload(&self, status: &str) {
        self.inner
            .artifact_uploads_total
            .with_label_values(&[status])
            .inc();
    }

    /// Record a catalog listing failure (`repositories` or `artifacts`).
    pub fn inc_catalog_failure(&self, listing: &str) {
        self.inner
            .catalog_failures_total
            .with_label_values(&[listing])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the gathered families cannot be encoded.
    pub fn render(&self) -> Result<String> {
        TextEncoder::new()
            .encode_to_string(&self.inner.registry.gather())
            .map_err(|source| TelemetryError::Render { source })
    }

    /// Take a point-in-time snapshot of the migration counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let provisioned = |outcome: &str| {
            self.inner
                .repositories_provisioned_total
                .with_label_values(&[outcome])
                .get()
        };
        let downloads = |status: &str| {
            self.inner
                .artifact_downloads_total
                .with_label_values(&[status])
                .get()
        };
        let uploads = |status: &str| {
            self.inner
                .artifact_uploads_total
                .with_label_values(&[status])
                .get()
        };
        let catalog_failures_total = ["repositories", "artifacts"]
            .iter()
            .map(|listing| {
                self.inner
                    .catalog_failures_total
                    .with_label_values(&[*listing])
                    .get()
            })
            .sum();

        MetricsSnapshot {
            migration_runs_total: self.inner.migration_runs_total.get(),
            repositories_created_total: provisioned("created"),
            repositories_existing_total: provisioned("already_exists"),
            repositories_failed_total: provisioned("failed"),
            downloads_succeeded_total: downloads("success"),
            downloads_failed_total: downloads("failure"),
            uploads_succeeded_total: uploads("success"),
            uploads_failed_total: uploads("failure"),
            catalog_failures_total,
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::Collector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Collector { name, source })
}
