// handlers/admin/users.rs - /api/admin/users handlers

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::rbac::{Role, ADMIN_USERS_MANAGE};
use crate::state::AppState;
use crate::store::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<&User> for AdminUserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.full_name.clone(),
            role: user.role,
            is_active: user.is_active(),
        }
    }
}

/// GET /api/admin/users - every account, deleted ones included, sorted by email
pub async fn users_get(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Vec<AdminUserSummary>> {
    auth_user.require_permission(ADMIN_USERS_MANAGE)?;

    let mut users: Vec<AdminUserSummary> = state
        .store
        .get_all()
        .await
        .iter()
        .map(AdminUserSummary::from)
        .collect();
    users.sort_by_key(|u| u.email.to_lowercase());

    Ok(ApiResponse::success(users))
}

/// POST /api/admin/users/:id/deactivate
pub async fn user_deactivate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AdminUserSummary> {
    auth_user.require_permission(ADMIN_USERS_MANAGE)?;

    if auth_user.user_id == Some(id) {
        return Err(ApiError::bad_request("You cannot deactivate your own account."));
    }
    if !state.store.soft_delete(id).await {
        return Err(ApiError::not_found("User not found."));
    }
    tracing::info!("User {} deactivated by {}", id, auth_user.email);

    reload(&state, id).await
}

/// POST /api/admin/users/:id/reactivate
pub async fn user_reactivate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AdminUserSummary> {
    auth_user.require_permission(ADMIN_USERS_MANAGE)?;

    if !state.store.restore(id).await {
        return Err(ApiError::not_found("User not found."));
    }
    tracing::info!("User {} reactivated by {}", id, auth_user.email);

    reload(&state, id).await
}

async fn reload(state: &AppState, id: Uuid) -> ApiResult<AdminUserSummary> {
    let user = state
        .store
        .get_by_id(id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found."))?;
    Ok(ApiResponse::success(AdminUserSummary::from(&user)))
}
