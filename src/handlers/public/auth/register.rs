// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, Json};
use serde::Deserialize;

use super::utils::is_valid_email;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, MessageResponse};
use crate::rbac::Role;
use crate::state::AppState;
use crate::store::{StoreError, User};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub gender: String,
    pub password: String,
    pub confirm_password: String,
}

/// POST /api/auth/register - Register new user account
///
/// Input:
/// ```json
/// {
///   "email": "jane@corp.com",
///   "firstName": "Jane",
///   "lastName": "Doe",
///   "country": "LK",
///   "gender": "F",
///   "password": "Secret@123",
///   "confirmPassword": "Secret@123"
/// }
/// ```
///
/// The first account created in an empty store becomes `Admin`.
pub async fn register_post(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<MessageResponse> {
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(ApiError::field_error("email", "Email is required."));
    }
    if !is_valid_email(email) {
        return Err(ApiError::field_error("email", "Email address is not valid."));
    }
    if payload.password.trim().is_empty() {
        return Err(ApiError::field_error("password", "Password is required."));
    }

    if state.store.get_by_email(email).await.is_some() {
        return Err(StoreError::DuplicateEmail.into());
    }
    if payload.password != payload.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match."));
    }

    let full_name = format!("{} {}", payload.first_name.trim(), payload.last_name.trim());
    let mut user = User::new(
        email,
        full_name.trim(),
        Role::User,
        state.passwords.hash(&payload.password)?,
    );
    user.first_name = payload.first_name.trim().to_string();
    user.last_name = payload.last_name.trim().to_string();
    user.country = payload.country.trim().to_string();
    user.gender = payload.gender.trim().to_string();

    // The store re-checks the email and picks the first-user role under one lock.
    let user = state.store.insert_first_as(user, Role::Admin).await?;
    tracing::info!("Registered user {} as {}", user.id, user.role);

    Ok(ApiResponse::success(MessageResponse::new(
        "User registered successfully.",
    )))
}
