//! Destination-facing pass-through handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use nexart_core::DestinationAdmin;
use tracing::info;

use crate::http::dto::{
    DeleteQuery, DestinationQuery, ParsedArguments, PassThroughResponse, UpdateRequest,
};
use crate::http::errors::ApiError;
use crate::state::ApiState;

fn query_rejected(rejection: &QueryRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

pub(crate) async fn list_repositories(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<DestinationQuery>, QueryRejection>,
) -> Result<Json<PassThroughResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| query_rejected(&rejection))?;
    let destination = query.endpoint()?;
    let outcome = DestinationAdmin::new(state.client.clone())
        .list_repositories(&destination)
        .await?;
    Ok(Json(PassThroughResponse::new(
        outcome,
        ParsedArguments::destination(&destination),
    )))
}

pub(crate) async fn get_repository(
    State(state): State<Arc<ApiState>>,
    Path(repository_key): Path<String>,
    query: Result<Query<DestinationQuery>, QueryRejection>,
) -> Result<Json<PassThroughResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| query_rejected(&rejection))?;
    let destination = query.endpoint()?;
    let outcome = DestinationAdmin::new(state.client.clone())
        .get_repository(&destination, &repository_key)
        .await?;
    Ok(Json(PassThroughResponse::new(
        outcome,
        ParsedArguments::destination(&destination).with_key(&repository_key),
    )))
}

pub(crate) async fn delete_repository(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<PassThroughResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| query_rejected(&rejection))?;
    let destination = query.endpoint()?;
    let key = query.key()?;
    info!(repository = %key, "destination repository deletion requested");
    let outcome = DestinationAdmin::new(state.client.clone())
        .delete_repository(&destination, &key)
        .await?;
    Ok(Json(PassThroughResponse::new(
        outcome,
        ParsedArguments::destination(&destination).with_key(&key),
    )))
}

pub(crate) async fn update_repository(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<PassThroughResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let destination = request.endpoint()?;
    let update = request.update()?;
    info!(
        repository = %update.key,
        rclass = %update.rclass,
        "destination repository update requested"
    );
    let outcome = DestinationAdmin::new(state.client.clone())
        .update_repository(&destination, &update)
        .await?;
    Ok(Json(PassThroughResponse::new(
        outcome,
        ParsedArguments::destination(&destination).with_update(&update),
    )))
}
