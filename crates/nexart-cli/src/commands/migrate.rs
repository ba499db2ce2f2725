use anyhow::anyhow;
use nexart_core::{MigrationContext, MigrationOrchestrator, ProvisionOutcome, RunReport};
use nexart_telemetry::Metrics;

use crate::cli::{MigrateArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_run_report;

pub(crate) async fn handle_migrate(
    ctx: &AppContext,
    args: &MigrateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let source = args.source.endpoint()?;
    let destination = args.destination()?;
    let metrics = Metrics::new().map_err(CliError::failure)?;

    let context = MigrationContext::new(
        ctx.client.clone(),
        source,
        destination,
        ctx.staging_root.clone(),
    )
    .with_concurrency(args.concurrency);
    let orchestrator = MigrationOrchestrator::from_context(&context, metrics);

    let filter = args.repo.as_deref().map(str::trim).filter(|name| !name.is_empty());
    let report = orchestrator.run(filter).await;
    render_run_report(&report, format)?;

    if args.strict {
        ensure_clean_run(&report)?;
    }
    Ok(())
}

fn ensure_clean_run(report: &RunReport) -> CliResult<()> {
    let failed_repositories = report
        .provisioned_repositories
        .iter()
        .filter(|repo| repo.outcome == ProvisionOutcome::Failed)
        .count();
    let failed_artifacts = report.failed_artifacts.len();
    let catalog_failures = report.catalog_failures.len();
    let failures = failed_repositories + failed_artifacts + catalog_failures;
    if failures == 0 {
        return Ok(());
    }
    Err(CliError::failure(anyhow!(
        "run {} finished with {failures} failed items",
        report.run_id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::cli::SourceArgs;

    fn context(staging_root: &std::path::Path) -> AppContext {
        AppContext {
            client: reqwest::Client::new(),
            staging_root: staging_root.to_path_buf(),
        }
    }

    fn args(nexus: String, jfrog: String, strict: bool) -> MigrateArgs {
        MigrateArgs {
            source: SourceArgs {
                nexus_url: nexus,
                nexus_username: "user".to_string(),
                nexus_password: "pass".to_string(),
            },
            jfrog_url: jfrog,
            jfrog_api_key: "key".to_string(),
            repo: None,
            concurrency: NonZeroUsize::MIN,
            strict,
        }
    }

    #[tokio::test]
    async fn migrates_one_artifact_end_to_end() -> anyhow::Result<()> {
        let nexus = MockServer::start_async().await;
        let jfrog = MockServer::start_async().await;
        let staging = tempfile::tempdir()?;

        let repos = nexus.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/repositories");
            then.status(200)
                .json_body(json!([{"name": "libs-a", "type": "hosted", "format": "maven2"}]));
        });
        let assets = nexus.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/search/assets")
                .query_param("repository", "libs-a");
            then.status(200)
                .json_body(json!({"items": [{"path": "com/acme", "name": "a.jar"}]}));
        });
        let download = nexus.mock(|when, then| {
            when.method(GET).path("/repository/libs-a/com/acme/a.jar");
            then.status(200).body("jar-bytes");
        });
        let provision = jfrog.mock(|when, then| {
            when.method(PUT)
                .path("/artifactory/api/repositories/libs-a")
                .header("x-jfrog-art-api", "key");
            then.status(200);
        });
        let upload = jfrog.mock(|when, then| {
            when.method(PUT)
                .path("/artifactory/libs-a/com/acme/a.jar")
                .body("jar-bytes");
            then.status(201);
        });

        let result = handle_migrate(
            &context(staging.path()),
            &args(nexus.base_url(), jfrog.base_url(), true),
            OutputFormat::Json,
        )
        .await;
        assert!(result.is_ok());
        repos.assert();
        assets.assert();
        download.assert();
        provision.assert();
        upload.assert();
        Ok(())
    }

    #[tokio::test]
    async fn strict_mode_fails_on_catalog_errors() -> anyhow::Result<()> {
        let nexus = MockServer::start_async().await;
        let staging = tempfile::tempdir()?;
        let repos = nexus.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/repositories");
            then.status(500);
        });

        let lenient = handle_migrate(
            &context(staging.path()),
            &args(nexus.base_url(), "https://jfrog.invalid".to_string(), false),
            OutputFormat::Table,
        )
        .await;
        assert!(lenient.is_ok());

        let strict = handle_migrate(
            &context(staging.path()),
            &args(nexus.base_url(), "https://jfrog.invalid".to_string(), true),
            OutputFormat::Table,
        )
        .await
        .err();
        assert_eq!(strict.map(|err| err.exit_code()), Some(3));
        repos.assert_hits(2);
        Ok(())
    }

    #[tokio::test]
    async fn blank_api_key_is_rejected_before_any_call() {
        let mut invalid = args(
            "https://nexus.invalid".to_string(),
            "https://jfrog.invalid".to_string(),
            false,
        );
        invalid.jfrog_api_key = "  ".to_string();
        let err = handle_migrate(&context(&std::env::temp_dir()), &invalid, OutputFormat::Json)
            .await
            .err();
        assert_eq!(err.map(|err| err.exit_code()), Some(2));
    }
}
