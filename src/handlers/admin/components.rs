// handlers/admin/components.rs - /api/admin/components handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::rbac::{ComponentInput, ComponentResource, ADMIN_SETTINGS_MANAGE};
use crate::state::AppState;

pub async fn components_get(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Vec<ComponentResource>> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.components()))
}

/// POST /api/admin/components
///
/// ```json
/// { "code": "BANK_FEEDS", "name": "Bank Feeds", "routePath": "/app/feeds", "category": "Reconciliation" }
/// ```
pub async fn component_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ComponentInput>,
) -> ApiResult<ComponentResource> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;

    let component = state.rbac.create_component(input)?;
    tracing::info!("Component {} created by {}", component.code, auth_user.email);
    Ok(ApiResponse::created(component))
}

/// PUT /api/admin/components/:id - renaming the code rewrites its permission codes
pub async fn component_put(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ComponentInput>,
) -> ApiResult<ComponentResource> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.update_component(&id, input)?))
}

pub async fn component_deactivate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ComponentResource> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.set_component_active(&id, false)?))
}

pub async fn component_reactivate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ComponentResource> {
    auth_user.require_permission(ADMIN_SETTINGS_MANAGE)?;
    Ok(ApiResponse::success(state.rbac.set_component_active(&id, true)?))
}
