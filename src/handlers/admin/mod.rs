// handlers/admin/mod.rs - RBAC administration handlers
//
// Behind `jwt_auth_middleware`. User administration requires
// ADMIN.USERS.MANAGE; the role/component/permission catalogue requires
// ADMIN.SETTINGS.MANAGE. Checks happen per handler so one router layer
// serves both groups.
pub mod components;
pub mod permissions;
pub mod roles;
pub mod users;

pub use components::{component_deactivate, component_post, component_put, component_reactivate, components_get};
pub use permissions::{actions_get, matrix_get, matrix_put, role_permissions_get};
pub use roles::{role_deactivate, role_post, role_put, role_reactivate, roles_get};
pub use users::{user_deactivate, user_reactivate, users_get};
