//! Source-facing handlers: repository listing and the migration run.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use nexart_core::{DestinationAdmin, MigrationContext, MigrationOrchestrator, RunReport};
use tracing::info;

use crate::http::dto::{ParsedArguments, PassThroughResponse, PushReposRequest, SourceQuery};
use crate::http::errors::ApiError;
use crate::state::ApiState;

pub(crate) async fn list_source_repositories(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<SourceQuery>, QueryRejection>,
) -> Result<Json<PassThroughResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let source = query.endpoint()?;
    let outcome = DestinationAdmin::new(state.client.clone())
        .list_source_repositories(&source)
        .await?;
    Ok(Json(PassThroughResponse::new(
        outcome,
        ParsedArguments::source(&source),
    )))
}

pub(crate) async fn push_repositories(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<PushReposRequest>, JsonRejection>,
) -> Result<Json<RunReport>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let context = MigrationContext::new(
        state.client.clone(),
        request.source()?,
        request.destination()?,
        state.staging_root.clone(),
    )
    .with_concurrency(state.concurrency);
    info!(
        source = %context.source.base_url,
        destination = %context.destination.base_url,
        filter = request.filter().unwrap_or("*"),
        "migration requested"
    );
    let report = MigrationOrchestrator::from_context(&context, state.telemetry.clone())
        .run(request.filter())
        .await;
    Ok(Json(report))
}
