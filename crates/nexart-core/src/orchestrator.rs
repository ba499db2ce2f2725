//! End-to-end migration run.
//!
//! # Design
//! - Repositories are processed one at a time; `ensure` returns before any of
//!   the repository's transfers start.
//! - Transfers inside a repository run with bounded concurrency and results keep
//!   catalog order.
//! - Catalog failures are absorbed into the report; the run always completes.
//! - The run's stage is purged exactly once, after every transfer finished.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use nexart_telemetry::Metrics;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::catalog::{NexusCatalog, SourceCatalog};
use crate::context::MigrationContext;
use crate::model::{
    CatalogFailure, MigratedArtifact, ProvisionedRepository, RepositoryDescriptor, RunReport,
    TransferResult,
};
use crate::provision::{ArtifactoryProvisioner, RepositoryProvisioner};
use crate::stage::LocalStage;
use crate::transport::{ArtifactTransport, HttpTransporter};

/// Message carried by every completed run report.
pub const RUN_COMPLETED_MESSAGE: &str = "Migration completed successfully";

/// Drives catalog, provisioner, and transporter through one run.
#[derive(Clone)]
pub struct MigrationOrchestrator {
    catalog: Arc<dyn SourceCatalog>,
    provisioner: Arc<dyn RepositoryProvisioner>,
    transporter: Arc<dyn ArtifactTransport>,
    staging_root: PathBuf,
    concurrency: NonZeroUsize,
    metrics: Metrics,
}

#[derive(Default)]
struct RunTally {
    provisioned: Vec<ProvisionedRepository>,
    results: Vec<TransferResult>,
    catalog_failures: Vec<CatalogFailure>,
}

impl MigrationOrchestrator {
    /// Orchestrator over explicit collaborators.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn SourceCatalog>,
        provisioner: Arc<dyn RepositoryProvisioner>,
        transporter: Arc<dyn ArtifactTransport>,
        staging_root: PathBuf,
        metrics: Metrics,
    ) -> Self {
        Self {
            catalog,
            provisioner,
            transporter,
            staging_root,
            concurrency: NonZeroUsize::MIN,
            metrics,
        }
    }

    /// Orchestrator wired to the HTTP implementations described by `context`.
    #[must_use]
    pub fn from_context(context: &MigrationContext, metrics: Metrics) -> Self {
        let catalog = NexusCatalog::new(context.client.clone(), context.source.clone());
        let provisioner =
            ArtifactoryProvisioner::new(context.client.clone(), context.destination.clone());
        let transporter = HttpTransporter::new(
            context.client.clone(),
            context.source.clone(),
            context.destination.clone(),
            metrics.clone(),
        );
        Self::new(
            Arc::new(catalog),
            Arc::new(provisioner),
            Arc::new(transporter),
            context.staging_root.clone(),
            metrics,
        )
        .with_concurrency(context.concurrency)
    }

    /// Override the per-repository transfer concurrency.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Run a migration, optionally restricted to the repository named `filter`.
    ///
    /// An empty filter migrates every repository.
    pub async fn run(&self, filter: Option<&str>) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("migration.run", %run_id, filter = filter.unwrap_or("*"));
        self.run_inner(run_id, filter.filter(|name| !name.is_empty()))
            .instrument(span)
            .await
    }

    async fn run_inner(&self, run_id: Uuid, filter: Option<&str>) -> RunReport {
        let started_at = Utc::now();
        let stage = LocalStage::for_run(&self.staging_root, run_id);
        let mut tally = RunTally::default();
        info!(
            root = %stage.root().display(),
            concurrency = self.concurrency.get(),
            "migration started"
        );

        for repository in self.source_repositories(&mut tally).await {
            if filter.is_some_and(|name| name != repository.name) {
                continue;
            }
            self.migrate_repository(&repository, &stage, &mut tally).await;
        }

        if let Err(err) = stage.purge_all().await {
            error!(detail = %err.detail(), "staging purge failed");
        }
        self.metrics.inc_migration_run();

        let (succeeded, failed): (Vec<_>, Vec<_>) =
            tally.results.into_iter().partition(TransferResult::is_success);
        info!(
            repositories = tally.provisioned.len(),
            migrated = succeeded.len(),
            failed = failed.len(),
            catalog_failures = tally.catalog_failures.len(),
            "migration finished"
        );
        RunReport {
            run_id,
            message: RUN_COMPLETED_MESSAGE.to_string(),
            started_at,
            finished_at: Utc::now(),
            provisioned_repositories: tally.provisioned,
            migrated_artifacts: succeeded.iter().map(MigratedArtifact::from).collect(),
            failed_artifacts: failed,
            catalog_failures: tally.catalog_failures,
        }
    }

    async fn source_repositories(&self, tally: &mut RunTally) -> Vec<RepositoryDescriptor> {
        match self.catalog.list_repositories().await {
            Ok(repositories) => repositories,
            Err(err) => {
                warn!(detail = %err.detail(), "source repositories could not be listed");
                self.metrics.inc_catalog_failure("repositories");
                tally.catalog_failures.push(CatalogFailure {
                    repository_name: None,
                    reason: err.detail(),
                });
                Vec::new()
            }
        }
    }

    async fn migrate_repository(
        &self,
        repository: &RepositoryDescriptor,
        stage: &LocalStage,
        tally: &mut RunTally,
    ) {
        let provisioned = self.provisioner.ensure(repository).await;
        self.metrics
            .inc_repository_provisioned(provisioned.outcome.as_str());
        tally.provisioned.push(provisioned);

        let artifacts = match self.catalog.list_artifacts(&repository.name).await {
            Ok(artifacts) => artifacts,
            Err(err) => {
                warn!(
                    repository = %repository.name,
                    detail = %err.detail(),
                    "source assets could not be listed"
                );
                self.metrics.inc_catalog_failure("artifacts");
                tally.catalog_failures.push(CatalogFailure {
                    repository_name: Some(repository.name.clone()),
                    reason: err.detail(),
                });
                return;
            }
        };
        info!(repository = %repository.name, artifacts = artifacts.len(), "transferring artifacts");

        let transporter = &self.transporter;
        let transfers: Vec<_> = artifacts
            .iter()
            .map(|artifact| transporter.transfer(artifact, stage))
            .collect();
        let results: Vec<TransferResult> = stream::iter(transfers)
            .buffered(self.concurrency.get())
            .collect()
            .await;
        tally.results.extend(results);
    }
}
