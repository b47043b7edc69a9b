use std::sync::Arc;

use crate::auth::{PasswordError, PasswordService, TokenService};
use crate::config::AppConfig;
use crate::rbac::RbacCatalog;
use crate::store::{InMemoryUserStore, UserStore};

/// Shared services handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn UserStore>,
    pub tokens: TokenService,
    pub passwords: PasswordService,
    pub rbac: Arc<RbacCatalog>,
}

impl AppState {
    /// Build the services from configuration, seeding demo users when enabled.
    pub fn from_config(config: AppConfig) -> Result<Self, PasswordError> {
        let passwords = PasswordService::new();
        let store = if config.seed.demo_users {
            InMemoryUserStore::seeded(&passwords)?
        } else {
            InMemoryUserStore::new()
        };
        tracing::debug!("User store ready (demo users: {})", config.seed.demo_users);

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn UserStore>) -> Self {
        Self {
            tokens: TokenService::new(&config.jwt),
            passwords: PasswordService::new(),
            rbac: Arc::new(RbacCatalog::seeded()),
            config: Arc::new(config),
            store,
        }
    }
}
