use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::role::*;
use crate::role::RoleStore;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Roles",
    operation_id = "listRoles",
    summary = "List dashboard roles",
    responses(
        (status = 200, description = "All role records ordered by id", body = Vec<RoleResponse>),
        (status = 400, description = "Datastore error (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let roles = RoleStore::new(&state.db).list().await?;
    Ok(Json(roles.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Roles",
    operation_id = "createRole",
    summary = "Assign a role to an operator",
    description = "Emails are trimmed and lowercased. Each email holds at most one role; delete and recreate to change it.",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Invalid email (VALIDATION_ERROR), email already assigned (DUPLICATE) or datastore error (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(role = %payload.role))]
pub async fn create_role(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = RoleStore::new(&state.db)
        .add(&payload.email, payload.role)
        .await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(created))))
}

#[utoipa::path(
    delete,
    path = "/",
    tag = "Roles",
    operation_id = "deleteRole",
    summary = "Remove a role record",
    request_body = DeleteRoleRequest,
    responses(
        (status = 204, description = "Role removed"),
        (status = 400, description = "Datastore error (UPSTREAM_ERROR)", body = ErrorBody),
        (status = 404, description = "Role not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = payload.id))]
pub async fn delete_role(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DeleteRoleRequest>,
) -> Result<StatusCode, AppError> {
    RoleStore::new(&state.db).remove(payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/lookup",
    tag = "Roles",
    operation_id = "lookupRole",
    summary = "Look up an operator's role",
    params(RoleLookupQuery),
    responses(
        (status = 200, description = "Role record", body = RoleResponse),
        (status = 400, description = "Invalid email (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No role assigned (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn lookup_role(
    State(state): State<AppState>,
    Query(query): Query<RoleLookupQuery>,
) -> Result<Json<RoleResponse>, AppError> {
    let email = query.email.unwrap_or_default();
    let found = RoleStore::new(&state.db).lookup(&email).await?;
    Ok(Json(found.into()))
}
