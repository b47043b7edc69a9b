pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rbac;
pub mod routes;
pub mod state;
pub mod store;

pub use routes::app;
pub use state::AppState;
