use nexart_core::DestinationAdmin;

use crate::cli::{OutputFormat, SourceArgs};
use crate::client::{AppContext, CliError, CliResult, ensure_upstream_success};
use crate::output::render_pass_through;

const SOURCE_COLUMNS: &[&str] = &["name", "type", "format", "url"];

pub(crate) async fn handle_source_repos(
    ctx: &AppContext,
    args: &SourceArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let source = args.endpoint()?;
    let outcome = DestinationAdmin::new(ctx.client.clone())
        .list_source_repositories(&source)
        .await
        .map_err(CliError::failure)?;
    render_pass_through(&outcome, SOURCE_COLUMNS, format)?;
    ensure_upstream_success("source repository listing", &outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn context() -> AppContext {
        AppContext {
            client: reqwest::Client::new(),
            staging_root: std::env::temp_dir(),
        }
    }

    fn args(url: String) -> SourceArgs {
        SourceArgs {
            nexus_url: url,
            nexus_username: "user".to_string(),
            nexus_password: "pass".to_string(),
        }
    }

    #[tokio::test]
    async fn lists_source_repositories_with_basic_auth() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/repositories")
                .header("authorization", "Basic dXNlcjpwYXNz");
            then.status(200)
                .json_body(json!([{"name": "libs-a", "type": "hosted", "format": "maven2"}]));
        });

        let result =
            handle_source_repos(&context(), &args(server.base_url()), OutputFormat::Json).await;
        assert!(result.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn upstream_rejection_is_a_failure() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/repositories");
            then.status(401).body("unauthorized");
        });

        let err = handle_source_repos(&context(), &args(server.base_url()), OutputFormat::Table)
            .await
            .err();
        assert_eq!(err.map(|err| err.exit_code()), Some(3));
        mock.assert();
    }

    #[tokio::test]
    async fn invalid_url_is_a_validation_error() {
        let invalid = args("not a url".to_string());
        let err = handle_source_repos(&context(), &invalid, OutputFormat::Json)
            .await
            .err();
        assert_eq!(err.map(|err| err.exit_code()), Some(2));
    }
}
