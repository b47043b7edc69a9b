// handlers/public/auth/recovery.rs - password recovery verification codes
//
// POST /api/auth/forgot-password issues a six-digit code with a short TTL;
// POST /api/auth/verify-code checks and consumes it. There is no mail
// transport: demo mode echoes a fixed code, otherwise the code is only logged.

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, MessageResponse};
use crate::state::AppState;
use crate::store::StoreError;

pub const DEMO_CODE: &str = "123456";
const GENERIC_REPLY: &str = "If that email exists, a code was sent.";
const INVALID_CODE: &str = "Invalid or expired verification code.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

/// POST /api/auth/forgot-password
///
/// ```json
/// { "email": "user@test.com" }
/// ```
pub async fn forgot_password_post(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<MessageResponse> {
    let user = match state.store.get_by_email(payload.email.trim()).await {
        Some(user) if user.is_active() => user,
        _ => return Ok(ApiResponse::success(MessageResponse::new(GENERIC_REPLY))),
    };

    let recovery = &state.config.recovery;
    let code = if recovery.demo_codes {
        DEMO_CODE.to_string()
    } else {
        generate_code()
    };

    let issued = code.clone();
    let expires_at = Utc::now() + Duration::minutes(recovery.code_ttl_minutes);
    let user = match state
        .store
        .modify(
            user.id,
            Box::new(move |user| {
                user.verification_code = Some(issued);
                user.verification_code_expires_at = Some(expires_at);
            }),
        )
        .await
    {
        Ok(user) => user,
        // Deactivated between the lookup and the write
        Err(StoreError::Deleted(_)) | Err(StoreError::NotFound(_)) => {
            return Ok(ApiResponse::success(MessageResponse::new(GENERIC_REPLY)))
        }
        Err(err) => return Err(err.into()),
    };

    if recovery.demo_codes {
        tracing::info!("Issued demo verification code for user {}", user.id);
        Ok(ApiResponse::success(MessageResponse::new(format!(
            "Verification code sent (demo: {}).",
            DEMO_CODE
        ))))
    } else {
        tracing::debug!("Verification code for user {}: {}", user.id, code);
        Ok(ApiResponse::success(MessageResponse::new(GENERIC_REPLY)))
    }
}

/// POST /api/auth/verify-code
///
/// ```json
/// { "email": "user@test.com", "code": "123456" }
/// ```
///
/// A successful check clears the code so it cannot be replayed.
pub async fn verify_code_post(
    State(state): State<AppState>,
    Json(payload): Json<VerifyCodeRequest>,
) -> ApiResult<MessageResponse> {
    let user = state
        .store
        .get_by_email(payload.email.trim())
        .await
        .filter(|user| user.is_active())
        .filter(|user| user.verification_code_matches(&payload.code, Utc::now()))
        .ok_or_else(|| ApiError::bad_request(INVALID_CODE))?;

    // Only clear the code that was checked; a newer one stays usable.
    let verified = user.verification_code.clone();
    state
        .store
        .modify(
            user.id,
            Box::new(move |user| {
                if user.verification_code == verified {
                    user.clear_verification_code();
                }
            }),
        )
        .await
        .map_err(|_| ApiError::bad_request(INVALID_CODE))?;

    Ok(ApiResponse::success(MessageResponse::new(
        "Code verified successfully.",
    )))
}
