// handlers/admin/roles.rs - /api/admin/roles handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::rbac::{RoleDefinition, RoleInput, ADMIN_SETTINGS_MANAGE};
use crate::state::AppState;

/// GET /api/admin/roles
pub async fn roles_get(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Vec<RoleDefinition>> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.roles()))
}

/// POST /api/admin/roles
///
/// ```json
/// { "code": "controller", "name": "Controller", "description": "Signs off the close" }
/// ```
///
/// Codes are upper-cased and must be unique; a clash is a 409.
pub async fn role_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<RoleInput>,
) -> ApiResult<RoleDefinition> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;

    let role = state.rbac.create_role(input)?;
    tracing::info!("Role {} created by {}", role.code, auth_user.email);
    Ok(ApiResponse::created(role))
}

/// PUT /api/admin/roles/:id
pub async fn role_put(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<RoleInput>,
) -> ApiResult<RoleDefinition> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.update_role(&id, input)?))
}

/// POST /api/admin/roles/:id/deactivate
pub async fn role_deactivate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<RoleDefinition> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.set_role_active(&id, false)?))
}

/// POST /api/admin/roles/:id/reactivate
pub async fn role_reactivate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<RoleDefinition> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.set_role_active(&id, true)?))
}
