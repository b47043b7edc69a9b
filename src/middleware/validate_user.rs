use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::User;

/// Live user record behind the bearer token's `sub` claim
#[derive(Clone, Debug)]
pub struct ValidatedUser(pub User);

/// Middleware that resolves the JWT subject against the user store.
/// Ensures the user exists and has not been soft-deleted since the token was issued.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user_id = auth_user
        .user_id
        .ok_or_else(|| ApiError::unauthorized("Token subject is not a valid user id"))?;

    let user = match state.store.get_by_id(user_id).await {
        Some(user) if user.is_active() => user,
        _ => {
            tracing::warn!(
                "User validation failed: user '{}' (ID: {}) not found or inactive",
                auth_user.email,
                user_id
            );
            return Err(ApiError::unauthorized("User not found or inactive"));
        }
    };

    request.extensions_mut().insert(ValidatedUser(user));

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for ValidatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ValidatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
