use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, User, UserChange, UserStore};
use crate::auth::{PasswordError, PasswordService};
use crate::rbac::Role;

#[derive(Debug, Default)]
struct Indexes {
    by_id: HashMap<Uuid, User>,
    /// Lower-cased email -> id
    by_email: HashMap<String, Uuid>,
}

impl Indexes {
    fn put(&mut self, user: User) {
        self.by_email.insert(email_key(&user.email), user.id);
        self.by_id.insert(user.id, user);
    }

    fn add(&mut self, mut user: User) -> Result<User, StoreError> {
        if self.by_email.contains_key(&email_key(&user.email)) {
            return Err(StoreError::DuplicateEmail);
        }
        if user.permissions.is_empty() {
            user.permissions = user.role.default_permissions();
        }
        self.put(user.clone());
        Ok(user)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Process-local user store; both indexes sit behind one lock so they never
/// disagree. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Indexes>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one admin and one regular user.
    pub fn seeded(passwords: &PasswordService) -> Result<Self, PasswordError> {
        let admin = User::new(
            "admin@test.com",
            "System Admin",
            Role::Admin,
            passwords.hash("Admin@123")?,
        );
        let user = User::new(
            "user@test.com",
            "Finance User",
            Role::User,
            passwords.hash("User@123")?,
        );

        let mut indexes = Indexes::default();
        indexes.put(admin);
        indexes.put(user);

        Ok(Self {
            inner: RwLock::new(indexes),
        })
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        inner
            .by_email
            .get(&email_key(email))
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    async fn get_by_id(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.by_id.get(&id).cloned()
    }

    async fn get_all(&self) -> Vec<User> {
        self.inner.read().await.by_id.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        self.inner.write().await.add(user)
    }

    async fn insert_first_as(&self, mut user: User, first_role: Role) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.by_id.is_empty() {
            user.role = first_role;
            user.permissions = first_role.default_permissions();
        }
        inner.add(user)
    }

    async fn modify(&self, id: Uuid, change: UserChange) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        let current = inner.by_id.get(&id).ok_or(StoreError::NotFound(id))?;
        if current.is_deleted {
            return Err(StoreError::Deleted(id));
        }

        // Edit a copy so a rejected email change leaves the record as it was.
        let mut user = current.clone();
        change(&mut user);
        user.id = id;

        let previous_email = email_key(&current.email);
        let new_email = email_key(&user.email);
        if new_email != previous_email {
            if inner.by_email.contains_key(&new_email) {
                return Err(StoreError::DuplicateEmail);
            }
            inner.by_email.remove(&previous_email);
        }

        user.updated_at = Utc::now();
        if user.permissions.is_empty() {
            user.permissions = user.role.default_permissions();
        }
        inner.put(user.clone());
        Ok(user)
    }

    async fn soft_delete(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        match inner.by_id.get_mut(&id) {
            Some(user) => {
                user.is_deleted = true;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    async fn restore(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        match inner.by_id.get_mut(&id) {
            Some(user) => {
                user.is_deleted = false;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}
