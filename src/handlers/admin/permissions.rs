// handlers/admin/permissions.rs - /api/admin/permissions handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::rbac::{ActionDefinition, PermissionAssignment, ADMIN_SETTINGS_MANAGE};
use crate::state::AppState;

/// GET /api/admin/permissions/actions - the fixed action vocabulary
pub async fn actions_get(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Vec<ActionDefinition>> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.actions()))
}

/// GET /api/admin/permissions/matrix
///
/// ```json
/// [
///   {
///     "id": "r-accountant-cmp-matcher-VIEW",
///     "roleId": "r-accountant",
///     "componentId": "cmp-matcher",
///     "actionCode": "VIEW",
///     "permissionCode": "MATCHER.VIEW"
///   }
/// ]
/// ```
pub async fn matrix_get(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Vec<PermissionAssignment>> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.matrix()))
}

/// PUT /api/admin/permissions/matrix - replace the matrix wholesale.
/// `id` and `permissionCode` may be omitted; both are recomputed.
pub async fn matrix_put(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(assignments): Json<Vec<PermissionAssignment>>,
) -> ApiResult<Vec<PermissionAssignment>> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;

    let saved = state.rbac.save_matrix(assignments)?;
    tracing::info!(
        "Permission matrix replaced by {} ({} assignments)",
        auth_user.email,
        saved.len()
    );
    Ok(ApiResponse::success(saved))
}

/// GET /api/admin/permissions/roles/:code - effective permission codes for a role
pub async fn role_permissions_get(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<Vec<String>> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.permissions_for_role(&code)))
}
