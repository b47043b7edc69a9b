pub mod catalog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use catalog::{
    ActionDefinition, ComponentInput, ComponentResource, PermissionAssignment, RbacCatalog,
    RbacError, RoleDefinition, RoleInput,
};

pub const DASHBOARD_VIEW: &str = "DASHBOARD.VIEW";
pub const ADMIN_USERS_MANAGE: &str = "ADMIN.USERS.MANAGE";
pub const ADMIN_SETTINGS_MANAGE: &str = "ADMIN.SETTINGS.MANAGE";
pub const PROFILE_MANAGE: &str = "PROFILE.MANAGE";
pub const ACCOUNT_PASSWORD_CHANGE: &str = "ACCOUNT.PASSWORD.CHANGE";
pub const ACCOUNT_DELETE: &str = "ACCOUNT.DELETE";
pub const PHONE_UPDATE: &str = "PHONE.UPDATE";

const ADMIN_PERMISSIONS: &[&str] = &[
    DASHBOARD_VIEW,
    ADMIN_USERS_MANAGE,
    ADMIN_SETTINGS_MANAGE,
    PROFILE_MANAGE,
];

const USER_PERMISSIONS: &[&str] = &[
    DASHBOARD_VIEW,
    PROFILE_MANAGE,
    ACCOUNT_PASSWORD_CHANGE,
    ACCOUNT_DELETE,
    PHONE_UPDATE,
];

/// Account role carried on every user and in the token's `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    pub fn default_permissions(&self) -> Vec<String> {
        let codes = match self {
            Role::Admin => ADMIN_PERMISSIONS,
            Role::User => USER_PERMISSIONS,
        };
        codes.iter().map(|c| c.to_string()).collect()
    }

    /// Case-insensitive comparison against a raw role claim.
    pub fn matches(&self, raw: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(raw.trim())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Role::Admin.matches(s) {
            Ok(Role::Admin)
        } else if Role::User.matches(s) {
            Ok(Role::User)
        } else {
            Err(RbacError::NotFound(format!("role '{}'", s)))
        }
    }
}
