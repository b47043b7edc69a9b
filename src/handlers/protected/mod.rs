// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`; profile routes also run
// `validate_user_middleware` so handlers receive the live user record.
pub mod dashboard; // GET /api/dashboard/summary
pub mod profile; // /api/profile/me[/change-password]
