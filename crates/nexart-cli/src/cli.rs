//! Argument parsing and command dispatch.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nexart_config::defaults::{DEFAULT_CONCURRENCY, DEFAULT_HTTP_TIMEOUT_SECS};
use nexart_config::{ArtifactoryEndpoint, NexusEndpoint};

use crate::client::{AppContext, CliError, CliResult, install_logging};
use crate::commands::dest::{
    handle_dest_delete, handle_dest_get, handle_dest_list, handle_dest_update,
};
use crate::commands::migrate::handle_migrate;
use crate::commands::source::handle_source_repos;

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = install_logging(&cli.log_level) {
        eprintln!("warning: {}", err.display_message());
    }
    run_with(cli).await
}

pub(crate) async fn run_with(cli: Cli) -> i32 {
    let ctx = match AppContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };
    match dispatch(cli, &ctx).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, ctx: &AppContext) -> CliResult<()> {
    match cli.command {
        Command::Source(SourceCommand::Repos(args)) => {
            handle_source_repos(ctx, &args, cli.output).await
        }
        Command::Migrate(args) => handle_migrate(ctx, &args, cli.output).await,
        Command::Dest(dest) => match dest {
            DestCommand::List(args) => handle_dest_list(ctx, &args, cli.output).await,
            DestCommand::Get(args) => handle_dest_get(ctx, &args, cli.output).await,
            DestCommand::Update(args) => handle_dest_update(ctx, &args, cli.output).await,
            DestCommand::Delete(args) => handle_dest_delete(ctx, &args, cli.output).await,
        },
    }
}

/// Upload failures and catalog errors are reported at `warn` and above.
const DEFAULT_CLI_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "nexart", about = "Migrate Nexus repositories and artifacts into Artifactory")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "NEXART_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long,
        global = true,
        env = "NEXART_ACCEPT_INVALID_CERTS",
        help = "Accept invalid TLS certificates from either endpoint"
    )]
    pub(crate) insecure: bool,
    #[arg(
        long,
        global = true,
        env = "NEXART_LOG_LEVEL",
        default_value = DEFAULT_CLI_LOG_LEVEL,
        help = "Log filter for diagnostics written to stderr (RUST_LOG takes precedence)"
    )]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "NEXART_STAGING_ROOT")]
    pub(crate) staging_root: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Inspect the source Nexus instance.
    #[command(subcommand)]
    Source(SourceCommand),
    /// Migrate repositories and artifacts from Nexus into Artifactory.
    Migrate(MigrateArgs),
    /// Manage destination repositories.
    #[command(subcommand)]
    Dest(DestCommand),
}

#[derive(Subcommand)]
pub(crate) enum SourceCommand {
    /// List source repositories.
    Repos(SourceArgs),
}

#[derive(Subcommand)]
pub(crate) enum DestCommand {
    /// List destination repositories.
    List(DestArgs),
    /// Show one destination repository.
    Get(DestKeyArgs),
    /// Update a destination repository.
    Update(DestUpdateArgs),
    /// Delete a destination repository.
    Delete(DestKeyArgs),
}

#[derive(Args, Clone)]
pub(crate) struct SourceArgs {
    #[arg(long, env = "NEXUS_URL")]
    pub(crate) nexus_url: String,
    #[arg(long, env = "NEXUS_USERNAME")]
    pub(crate) nexus_username: String,
    #[arg(long, env = "NEXUS_PASSWORD", hide_env_values = true)]
    pub(crate) nexus_password: String,
}

impl SourceArgs {
    pub(crate) fn endpoint(&self) -> CliResult<NexusEndpoint> {
        NexusEndpoint::parse(&self.nexus_url, &self.nexus_username, &self.nexus_password)
            .map_err(|err| CliError::validation(err.detail()))
    }
}

#[derive(Args, Clone)]
pub(crate) struct MigrateArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[arg(long, env = "JFROG_URL")]
    pub(crate) jfrog_url: String,
    #[arg(long, env = "JFROG_API_KEY", hide_env_values = true)]
    pub(crate) jfrog_api_key: String,
    #[arg(long, help = "Only migrate the repository with this name")]
    pub(crate) repo: Option<String>,
    #[arg(
        long,
        env = "NEXART_CONCURRENCY",
        default_value_t = NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
        help = "Artifact transfers in flight within one repository"
    )]
    pub(crate) concurrency: NonZeroUsize,
    #[arg(long, help = "Exit with a failure code when any item of the run failed")]
    pub(crate) strict: bool,
}

impl MigrateArgs {
    pub(crate) fn destination(&self) -> CliResult<ArtifactoryEndpoint> {
        ArtifactoryEndpoint::with_api_key(&self.jfrog_url, &self.jfrog_api_key)
            .map_err(|err| CliError::validation(err.detail()))
    }
}

#[derive(Args, Clone)]
pub(crate) struct DestArgs {
    #[arg(long, env = "JFROG_URL")]
    pub(crate) jfrog_url: String,
    #[arg(long, env = "JFROG_TOKEN", hide_env_values = true)]
    pub(crate) jfrog_token: String,
}

impl DestArgs {
    pub(crate) fn endpoint(&self) -> CliResult<ArtifactoryEndpoint> {
        ArtifactoryEndpoint::with_bearer(&self.jfrog_url, &self.jfrog_token)
            .map_err(|err| CliError::validation(err.detail()))
    }
}

#[derive(Args, Clone)]
pub(crate) struct DestKeyArgs {
    #[command(flatten)]
    pub(crate) destination: DestArgs,
    #[arg(help = "Repository key")]
    pub(crate) key: String,
}

#[derive(Args, Clone)]
pub(crate) struct DestUpdateArgs {
    #[command(flatten)]
    pub(crate) destination: DestArgs,
    #[arg(help = "Repository key")]
    pub(crate) key: String,
    #[arg(long, help = "Repository class: local, virtual, remote, or federated")]
    pub(crate) rclass: String,
    #[arg(long)]
    pub(crate) package_type: String,
    #[arg(long, default_value = "")]
    pub(crate) description: String,
}

#[derive(Copy, Clone, Debug, ValueEnum, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_arguments_parse_with_defaults() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "nexart",
            "--output",
            "json",
            "migrate",
            "--nexus-url",
            "https://nexus.local",
            "--nexus-username",
            "user",
            "--nexus-password",
            "pass",
            "--jfrog-url",
            "https://jfrog.local",
            "--jfrog-api-key",
            "key",
            "--repo",
            "libs-a",
        ])?;
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level, DEFAULT_CLI_LOG_LEVEL);
        let Command::Migrate(args) = cli.command else {
            panic!("expected migrate command");
        };
        assert_eq!(args.repo.as_deref(), Some("libs-a"));
        assert_eq!(args.concurrency.get(), DEFAULT_CONCURRENCY);
        assert!(!args.strict);
        assert!(args.destination().is_ok());
        Ok(())
    }

    #[test]
    fn dest_update_requires_class_and_key() {
        let missing = Cli::try_parse_from([
            "nexart",
            "dest",
            "update",
            "--jfrog-url",
            "https://jfrog.local",
            "--jfrog-token",
            "tok",
            "libs-a",
        ]);
        assert!(missing.is_err());
    }

    #[test]
    fn blank_credentials_are_validation_errors() {
        let args = SourceArgs {
            nexus_url: "https://nexus.local".to_string(),
            nexus_username: " ".to_string(),
            nexus_password: "pass".to_string(),
        };
        let err = args.endpoint().err();
        assert!(
            matches!(&err, Some(CliError::Validation(message)) if message.contains("username"))
        );
        assert_eq!(err.map(|err| err.exit_code()), Some(2));
    }
}
