use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use httpmock::prelude::*;
use nexart_config::{ArtifactoryEndpoint, HttpSettings, NexusEndpoint};
use nexart_core::{
    MigrationContext, MigrationOrchestrator, ProvisionOutcome, RUN_COMPLETED_MESSAGE, RunReport,
    build_http_client,
};
use nexart_telemetry::Metrics;
use serde_json::json;
use tempfile::TempDir;

struct Servers {
    nexus: MockServer,
    jfrog: MockServer,
}

impl Servers {
    async fn start() -> Self {
        Self {
            nexus: MockServer::start_async().await,
            jfrog: MockServer::start_async().await,
        }
    }

    fn context(&self, staging_root: &Path) -> Result<MigrationContext> {
        let client = build_http_client(&HttpSettings {
            timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
        })?;
        Ok(MigrationContext::new(
            client,
            NexusEndpoint::parse(&self.nexus.base_url(), "user", "pass")?,
            ArtifactoryEndpoint::with_api_key(&self.jfrog.base_url(), "api-key")?,
            staging_root.to_path_buf(),
        ))
    }

    fn libs_a_catalog(&self) {
        self.nexus.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/repositories");
            then.status(200)
                .json_body(json!([{"name": "libs-a", "type": "hosted", "format": "maven"}]));
        });
    }
}

async fn run(
    servers: &Servers,
    staging: &TempDir,
    filter: Option<&str>,
) -> Result<(RunReport, Metrics)> {
    let metrics = Metrics::new()?;
    let context = servers.context(staging.path())?;
    let orchestrator = MigrationOrchestrator::from_context(&context, metrics.clone());
    Ok((orchestrator.run(filter).await, metrics))
}

fn assert_staging_empty(staging: &TempDir) -> Result<()> {
    assert_eq!(std::fs::read_dir(staging.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn happy_path_creates_repository_and_migrates_artifact() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    let assets = servers.nexus.mock(|when, then| {
        when.method(GET)
            .path("/service/rest/v1/search/assets")
            .query_param("repository", "libs-a");
        then.status(200)
            .json_body(json!({"items": [{"path": "com/x", "name": "a-1.0.jar"}]}));
    });
    let download = servers.nexus.mock(|when, then| {
        when.method(GET).path("/repository/libs-a/com/x/a-1.0.jar");
        then.status(200).body("jar");
    });
    let provision = servers.jfrog.mock(|when, then| {
        when.method(PUT)
            .path("/artifactory/api/repositories/libs-a")
            .header("x-jfrog-art-api", "api-key");
        then.status(200);
    });
    let upload = servers.jfrog.mock(|when, then| {
        when.method(PUT)
            .path("/artifactory/libs-a/com/x/a-1.0.jar")
            .body("jar");
        then.status(201);
    });

    let (report, metrics) = run(&servers, &staging, None).await?;

    assets.assert();
    download.assert();
    provision.assert();
    upload.assert();
    assert_eq!(report.message, RUN_COMPLETED_MESSAGE);
    assert_eq!(report.provisioned_repositories.len(), 1);
    assert_eq!(report.provisioned_repositories[0].outcome, ProvisionOutcome::Created);
    let migrated = serde_json::to_value(&report.migrated_artifacts)?;
    assert_eq!(
        migrated,
        json!([{
            "repository_name": "libs-a",
            "artifact_path": "com/x",
            "artifact_filename": "a-1.0.jar"
        }])
    );
    assert!(report.failed_artifacts.is_empty());
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.migration_runs_total, 1);
    assert_eq!(snapshot.repositories_created_total, 1);
    assert_staging_empty(&staging)
}

#[tokio::test]
async fn existing_repository_still_transfers_artifacts() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/service/rest/v1/search/assets");
        then.status(200)
            .json_body(json!({"items": [{"path": "com/x", "name": "a-1.0.jar"}]}));
    });
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/repository/libs-a/com/x/a-1.0.jar");
        then.status(200).body("jar");
    });
    servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/api/repositories/libs-a");
        then.status(400).body("exists");
    });
    let upload = servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/libs-a/com/x/a-1.0.jar");
        then.status(201);
    });

    let (report, _) = run(&servers, &staging, None).await?;

    upload.assert();
    assert_eq!(
        report.provisioned_repositories[0].outcome,
        ProvisionOutcome::AlreadyExists
    );
    assert_eq!(report.migrated_artifacts.len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_provisioning_does_not_stop_transfers() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    let assets = servers.nexus.mock(|when, then| {
        when.method(GET)
            .path("/service/rest/v1/search/assets")
            .query_param("repository", "libs-a");
        then.status(200)
            .json_body(json!({"items": [{"path": "com/x", "name": "a-1.0.jar"}]}));
    });
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/repository/libs-a/com/x/a-1.0.jar");
        then.status(200).body("jar");
    });
    let provision = servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/api/repositories/libs-a");
        then.status(500).body("storage quota exceeded");
    });
    let upload = servers.jfrog.mock(|when, then| {
        when.method(PUT)
            .path("/artifactory/libs-a/com/x/a-1.0.jar")
            .body("jar");
        then.status(201);
    });

    let (report, metrics) = run(&servers, &staging, None).await?;

    provision.assert();
    assets.assert();
    upload.assert();
    let provisioned = &report.provisioned_repositories[0];
    assert_eq!(provisioned.outcome, ProvisionOutcome::Failed);
    assert!(
        provisioned
            .error
            .as_deref()
            .is_some_and(|detail| detail.contains("500"))
    );
    assert_eq!(report.migrated_artifacts.len(), 1);
    assert!(report.failed_artifacts.is_empty());
    assert_eq!(metrics.snapshot().repositories_failed_total, 1);
    assert_staging_empty(&staging)
}

#[tokio::test]
async fn failed_download_is_reported_without_upload() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/service/rest/v1/search/assets");
        then.status(200)
            .json_body(json!({"items": [{"path": "com/x", "name": "gone.jar"}]}));
    });
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/repository/libs-a/com/x/gone.jar");
        then.status(404);
    });
    servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/api/repositories/libs-a");
        then.status(200);
    });
    let upload = servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/libs-a/com/x/gone.jar");
        then.status(201);
    });

    let (report, _) = run(&servers, &staging, None).await?;

    upload.assert_hits(0);
    assert!(report.migrated_artifacts.is_empty());
    assert_eq!(report.failed_artifacts.len(), 1);
    let failure = &report.failed_artifacts[0];
    assert!(failure.local_file_path.is_none());
    assert!(failure.error.as_deref().is_some_and(|error| error.contains("404")));
    assert_staging_empty(&staging)
}

#[tokio::test]
async fn rejected_upload_still_counts_as_migrated() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/service/rest/v1/search/assets");
        then.status(200)
            .json_body(json!({"items": [{"path": "com/x", "name": "a-1.0.jar"}]}));
    });
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/repository/libs-a/com/x/a-1.0.jar");
        then.status(200).body("jar");
    });
    servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/api/repositories/libs-a");
        then.status(200);
    });
    servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/libs-a/com/x/a-1.0.jar");
        then.status(500);
    });

    let (report, metrics) = run(&servers, &staging, None).await?;

    assert_eq!(report.migrated_artifacts.len(), 1);
    assert!(report.failed_artifacts.is_empty());
    assert_eq!(metrics.snapshot().uploads_failed_total, 1);
    assert!(
        metrics
            .render()?
            .contains("artifact_uploads_total{status=\"failure\"} 1")
    );
    assert_staging_empty(&staging)
}

#[tokio::test]
async fn filter_without_match_makes_no_destination_calls() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    let assets = servers.nexus.mock(|when, then| {
        when.method(GET).path("/service/rest/v1/search/assets");
        then.status(200).json_body(json!({"items": []}));
    });
    let destination = servers.jfrog.mock(|_when, then| {
        then.status(200);
    });

    let (report, _) = run(&servers, &staging, Some("libs-b")).await?;

    assets.assert_hits(0);
    destination.assert_hits(0);
    assert!(report.provisioned_repositories.is_empty());
    assert!(report.migrated_artifacts.is_empty());
    assert_eq!(report.message, RUN_COMPLETED_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn catalog_failures_yield_a_report() -> Result<()> {
    let servers = Servers::start().await;
    let staging = TempDir::new()?;
    servers.libs_a_catalog();
    servers.nexus.mock(|when, then| {
        when.method(GET).path("/service/rest/v1/search/assets");
        then.status(503).body("search index rebuilding");
    });
    servers.jfrog.mock(|when, then| {
        when.method(PUT).path("/artifactory/api/repositories/libs-a");
        then.status(200);
    });

    let (report, metrics) = run(&servers, &staging, None).await?;

    assert_eq!(report.provisioned_repositories.len(), 1);
    assert!(report.migrated_artifacts.is_empty());
    assert_eq!(report.catalog_failures.len(), 1);
    assert_eq!(report.catalog_failures[0].repository_name.as_deref(), Some("libs-a"));
    assert!(report.catalog_failures[0].reason.contains("503"));
    assert_eq!(metrics.snapshot().catalog_failures_total, 1);
    Ok(())
}
