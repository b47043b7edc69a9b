// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, self-registration and password recovery. Nothing here
// receives an authenticated user, so every input is validated in the handler.
pub mod auth;
