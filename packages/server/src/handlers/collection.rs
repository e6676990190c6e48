use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use dashboard_common::CanonicalAddress;
use dashboard_common::storage::Cid;
use sea_orm::TransactionTrait;
use tracing::{info, instrument};

use crate::collection::{ActivationManager, CollectionRegistry};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::collection::*;
use crate::state::AppState;

fn parse_address(raw: &str) -> Result<CanonicalAddress, AppError> {
    CanonicalAddress::parse(raw).map_err(AppError::from)
}

/// Parse a client-supplied CID. A missing or blank value is a validation error.
fn require_cid(raw: Option<&str>) -> Result<Cid, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("cid is required".into()))?;
    Cid::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/{address}",
    tag = "Collections",
    operation_id = "getCollection",
    summary = "Get a collection",
    description = "Returns the collection's owner, latest published CID and whether it is the active collection.",
    params(("address" = String, Path, description = "Collection contract address")),
    responses(
        (status = 200, description = "Collection record", body = CollectionResponse),
        (status = 400, description = "Malformed address (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Collection not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_collection(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CollectionResponse>, AppError> {
    let address = parse_address(&address)?;
    let record = CollectionRegistry::new(&state.db).get(&address).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    put,
    path = "/{address}",
    tag = "Collections",
    operation_id = "upsertCollection",
    summary = "Record ownership and publication",
    description = "Creates the collection or updates its owner, then records the published metadata CID. Both writes happen in one transaction.",
    params(("address" = String, Path, description = "Collection contract address")),
    request_body = UpsertCollectionRequest,
    responses(
        (status = 200, description = "Recorded", body = OkResponse),
        (status = 400, description = "Missing or malformed fields (VALIDATION_ERROR, UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn upsert_collection(
    State(state): State<AppState>,
    Path(address): Path<String>,
    AppJson(payload): AppJson<UpsertCollectionRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let address = parse_address(&address)?;
    let owner = payload
        .owner
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .ok_or_else(|| AppError::Validation("owner is required".into()))?;
    let owner = parse_address(owner)?;
    let cid = require_cid(payload.cid.as_deref())?;

    let txn = state.db.begin().await?;
    let registry = CollectionRegistry::new(&txn);
    registry.upsert_ownership(&address, &owner).await?;
    registry.record_publication(&address, &cid).await?;
    txn.commit().await?;

    info!(address = %address, cid = %cid, "Recorded collection publication");
    Ok(Json(OkResponse::ok()))
}

#[utoipa::path(
    put,
    path = "/{address}/activate",
    tag = "Collections",
    operation_id = "activateCollection",
    summary = "Make a collection the active one",
    description = "Sets the collection's CID and moves the activation pointer to it. Every other collection becomes inactive in the same transaction.",
    params(("address" = String, Path, description = "Collection contract address")),
    request_body = ActivateRequest,
    responses(
        (status = 200, description = "Activated", body = OkResponse),
        (status = 400, description = "Missing cid (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Collection not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn activate_collection(
    State(state): State<AppState>,
    Path(address): Path<String>,
    AppJson(payload): AppJson<ActivateRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let address = parse_address(&address)?;
    let cid = require_cid(payload.cid.as_deref())?;

    ActivationManager::new(&state.db)
        .activate(&address, &cid)
        .await?;

    Ok(Json(OkResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/active-collection",
    tag = "Collections",
    operation_id = "getActiveCollection",
    summary = "Get the active collection",
    responses(
        (status = 200, description = "Active collection", body = ActiveCollectionResponse),
        (status = 404, description = "No collection is active (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_active_collection(
    State(state): State<AppState>,
) -> Result<Json<ActiveCollectionResponse>, AppError> {
    let active = ActivationManager::new(&state.db)
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("No collection is active".into()))?;
    Ok(Json(active.into()))
}

#[utoipa::path(
    delete,
    path = "/active-collection",
    tag = "Collections",
    operation_id = "deactivateCollection",
    summary = "Clear the active collection",
    responses(
        (status = 204, description = "No collection is active"),
        (status = 400, description = "Datastore error (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn deactivate_collection(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    ActivationManager::new(&state.db).deactivate().await?;
    Ok(StatusCode::NO_CONTENT)
}
