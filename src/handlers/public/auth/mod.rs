// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login; // POST /api/auth/login - authenticate and get JWT
pub mod recovery; // POST /api/auth/forgot-password, /api/auth/verify-code
pub mod register; // POST /api/auth/register - create new account
pub mod utils;

pub use login::login_post;
pub use recovery::{forgot_password_post, verify_code_post};
pub use register::register_post;
