// handlers/protected/profile.rs - /api/profile/me self-service handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MessageResponse, ValidatedUser};
use crate::rbac::Role;
use crate::state::AppState;
use crate::store::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            phone_number: user.phone_number.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/profile/me
///
/// ```json
/// {
///   "id": "6f1c...",
///   "email": "user@test.com",
///   "fullName": "Finance User",
///   "role": "User",
///   "phoneNumber": null
/// }
/// ```
pub async fn me_get(ValidatedUser(user): ValidatedUser) -> ApiResult<ProfileResponse> {
    Ok(ApiResponse::success(ProfileResponse::from(&user)))
}

/// PUT /api/profile/me
///
/// ```json
/// { "fullName": "Jane Doe", "phoneNumber": "+94 77 123 4567" }
/// ```
///
/// Both fields are optional. Admins may not set a phone number here; that
/// request is refused before anything is changed.
pub async fn me_put(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedUser(user): ValidatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<ProfileResponse> {
    if payload.phone_number.is_some() && auth_user.is_admin() {
        return Err(ApiError::forbidden(
            "Admins cannot update phone numbers via this endpoint.",
        ));
    }

    let full_name = payload
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let phone_number = payload
        .phone_number
        .as_deref()
        .map(|phone| phone.trim().to_string());

    let user = state
        .store
        .modify(
            user.id,
            Box::new(move |user| {
                if let Some(full_name) = full_name {
                    user.full_name = full_name;
                }
                if let Some(phone) = phone_number {
                    user.phone_number = Some(phone);
                }
            }),
        )
        .await?;
    tracing::info!("Profile updated for user {}", user.id);

    Ok(ApiResponse::success(ProfileResponse::from(&user)))
}

/// POST /api/profile/me/change-password
///
/// ```json
/// { "currentPassword": "User@123", "newPassword": "User@456" }
/// ```
pub async fn change_password_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedUser(user): ValidatedUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<MessageResponse> {
    if auth_user.role() != Role::User {
        return Err(ApiError::forbidden(
            "Only non-admin users may change their password here.",
        ));
    }
    if payload.current_password.trim().is_empty() {
        return Err(ApiError::bad_request("Current password is required."));
    }
    if payload.new_password.trim().is_empty() {
        return Err(ApiError::bad_request("New password is required."));
    }
    if !state
        .passwords
        .verify(&payload.current_password, &user.password_hash)
    {
        tracing::warn!("Password change for user {} failed verification", user.id);
        return Err(ApiError::bad_request("Current password is incorrect."));
    }

    let password_hash = state.passwords.hash(&payload.new_password)?;
    let user = state
        .store
        .modify(user.id, Box::new(move |user| user.password_hash = password_hash))
        .await?;
    tracing::info!("Password changed for user {}", user.id);

    Ok(ApiResponse::success(MessageResponse::new(
        "Password updated successfully.",
    )))
}

/// DELETE /api/profile/me - soft delete the caller's own account
pub async fn me_delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedUser(user): ValidatedUser,
) -> ApiResult<MessageResponse> {
    if auth_user.role() != Role::User {
        return Err(ApiError::forbidden(
            "Only non-admin users may delete their account.",
        ));
    }

    if !state.store.soft_delete(user.id).await {
        return Err(ApiError::not_found("User not found."));
    }
    tracing::info!("User {} deleted their account", user.id);

    Ok(ApiResponse::success(MessageResponse::new("Account deleted.")))
}
