pub mod memory;
pub mod models;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::InMemoryUserStore;
pub use models::User;

use crate::rbac::Role;

/// In-place edit applied to a stored user while the store holds its write lock.
pub type UserChange = Box<dyn FnOnce(&mut User) + Send>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email already registered.")]
    DuplicateEmail,
    #[error("User {0} not found")]
    NotFound(Uuid),
    #[error("User {0} is deactivated")]
    Deleted(Uuid),
}

/// User persistence seam. The only implementation today is in-memory; every
/// method is async so a database-backed store can slot in behind it.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup. Soft-deleted users are returned too; callers
    /// decide how to treat them.
    async fn get_by_email(&self, email: &str) -> Option<User>;

    async fn get_by_id(&self, id: Uuid) -> Option<User>;

    async fn get_all(&self) -> Vec<User>;

    async fn count(&self) -> usize;

    async fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Like `insert`, but the user takes `first_role` when the store is empty.
    /// The emptiness check and the insert happen under one lock.
    async fn insert_first_as(&self, user: User, first_role: Role) -> Result<User, StoreError>;

    /// Apply `change` to the current record under the write lock and return the
    /// result. Fields the change does not touch keep their latest values.
    /// Stamps `updated_at` and fills an empty permission set from the role
    /// defaults. Soft-deleted users are left untouched (`StoreError::Deleted`).
    async fn modify(&self, id: Uuid, change: UserChange) -> Result<User, StoreError>;

    /// Returns false when the id is unknown.
    async fn soft_delete(&self, id: Uuid) -> bool;

    /// Returns false when the id is unknown.
    async fn restore(&self, id: Uuid) -> bool;
}
