// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::utils::UserInfo;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

/// POST /api/auth/login - Authenticate user and receive JWT token
///
/// Input:
/// ```json
/// { "email": "admin@test.com", "password": "Admin@123" }
/// ```
///
/// Output:
/// ```json
/// {
///   "accessToken": "eyJhbGciOiJIUzI1NiI...",
///   "expiresIn": 3600,
///   "user": {
///     "id": "6f1c...",
///     "email": "admin@test.com",
///     "fullName": "System Admin",
///     "role": "Admin",
///     "phoneNumber": null,
///     "permissions": ["DASHBOARD.VIEW", "ADMIN.USERS.MANAGE", "..."]
///   }
/// }
/// ```
///
/// Unknown emails, deleted accounts and wrong passwords all get the same 401
/// so the response never reveals which part was wrong.
pub async fn login_post(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = payload.email.trim();

    let user = match state.store.get_by_email(email).await {
        Some(user)
            if user.is_active() && state.passwords.verify(&payload.password, &user.password_hash) =>
        {
            user
        }
        _ => {
            tracing::warn!("Failed login attempt for '{}'", email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let issued = state.tokens.issue(&user)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        access_token: issued.access_token,
        expires_in: issued.expires_in,
        user: UserInfo::from(&user),
    }))
}
