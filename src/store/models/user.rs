use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rbac::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub gender: String,
    pub role: Role,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub profile_image_url: Option<String>,
    pub permissions: Vec<String>,
    pub verification_code: Option<String>,
    pub verification_code_expires_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: &str, full_name: &str, role: Role, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            full_name: full_name.trim().to_string(),
            first_name: String::new(),
            last_name: String::new(),
            country: String::new(),
            gender: String::new(),
            role,
            password_hash,
            phone_number: None,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            profile_image_url: None,
            permissions: role.default_permissions(),
            verification_code: None,
            verification_code_expires_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// A code matches only when it is set, equal, and not past its expiry.
    pub fn verification_code_matches(&self, code: &str, now: DateTime<Utc>) -> bool {
        match (&self.verification_code, self.verification_code_expires_at) {
            (Some(stored), Some(expires_at)) => stored == code.trim() && expires_at >= now,
            _ => false,
        }
    }

    pub fn clear_verification_code(&mut self) {
        self.verification_code = None;
        self.verification_code_expires_at = None;
    }
}
