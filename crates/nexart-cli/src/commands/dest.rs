use nexart_core::{DestinationAdmin, RepositoryClass, RepositoryUpdate};

use crate::cli::{DestArgs, DestKeyArgs, DestUpdateArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, ensure_upstream_success};
use crate::output::render_pass_through;

const DEST_COLUMNS: &[&str] = &["key", "type", "packageType", "url"];

fn admin(ctx: &AppContext) -> DestinationAdmin {
    DestinationAdmin::new(ctx.client.clone())
}

pub(crate) async fn handle_dest_list(
    ctx: &AppContext,
    args: &DestArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let destination = args.endpoint()?;
    let outcome = admin(ctx)
        .list_repositories(&destination)
        .await
        .map_err(CliError::failure)?;
    render_pass_through(&outcome, DEST_COLUMNS, format)?;
    ensure_upstream_success("destination repository listing", &outcome)
}

pub(crate) async fn handle_dest_get(
    ctx: &AppContext,
    args: &DestKeyArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let destination = args.destination.endpoint()?;
    let outcome = admin(ctx)
        .get_repository(&destination, &args.key)
        .await
        .map_err(CliError::failure)?;
    render_pass_through(&outcome, &[], format)?;
    ensure_upstream_success("destination repository lookup", &outcome)
}

pub(crate) async fn handle_dest_update(
    ctx: &AppContext,
    args: &DestUpdateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let destination = args.destination.endpoint()?;
    let rclass: RepositoryClass = args.rclass.parse().map_err(CliError::validation)?;
    let update = RepositoryUpdate {
        key: args.key.clone(),
        rclass,
        package_type: args.package_type.clone(),
        description: args.description.clone(),
    };
    let outcome = admin(ctx)
        .update_repository(&destination, &update)
        .await
        .map_err(CliError::failure)?;
    render_pass_through(&outcome, &[], format)?;
    ensure_upstream_success("destination repository update", &outcome)
}

pub(crate) async fn handle_dest_delete(
    ctx: &AppContext,
    args: &DestKeyArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let destination = args.destination.endpoint()?;
    let outcome = admin(ctx)
        .delete_repository(&destination, &args.key)
        .await
        .map_err(CliError::failure)?;
    render_pass_through(&outcome, &[], format)?;
    ensure_upstream_success("destination repository delete", &outcome)
}
