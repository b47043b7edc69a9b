//! In-memory RBAC catalogue backing the admin screens.
//!
//! Roles, components and the role x component x action permission matrix all
//! live behind a single lock and reset on restart.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RbacError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_system: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResource {
    pub id: String,
    pub code: String,
    pub name: String,
    pub route_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInput {
    pub code: Option<String>,
    pub name: Option<String>,
    pub route_path: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionAssignment {
    #[serde(default)]
    pub id: String,
    pub role_id: String,
    pub component_id: String,
    pub action_code: String,
    #[serde(default)]
    pub permission_code: String,
}

#[derive(Debug, Default)]
struct CatalogState {
    roles: Vec<RoleDefinition>,
    components: Vec<ComponentResource>,
    actions: Vec<ActionDefinition>,
    assignments: Vec<PermissionAssignment>,
}

#[derive(Debug, Default)]
pub struct RbacCatalog {
    state: RwLock<CatalogState>,
}

fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace(' ', "_")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn role(id: &str, code: &str, name: &str, description: &str, is_system: bool) -> RoleDefinition {
    RoleDefinition {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        is_system,
        is_active: true,
    }
}

fn component(id: &str, code: &str, name: &str, route: &str, category: &str) -> ComponentResource {
    ComponentResource {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        route_path: route.to_string(),
        category: Some(category.to_string()),
        description: None,
        is_active: true,
    }
}

fn assignment(role: &RoleDefinition, component: &ComponentResource, action: &str) -> PermissionAssignment {
    PermissionAssignment {
        id: format!("{}-{}-{}", role.id, component.id, action),
        role_id: role.id.clone(),
        component_id: component.id.clone(),
        action_code: action.to_string(),
        permission_code: format!("{}.{}", component.code, action),
    }
}

impl RbacCatalog {
    /// Catalogue pre-populated with the built-in roles, components and a
    /// minimal permission matrix.
    pub fn seeded() -> Self {
        let roles = vec![
            role("r-admin", "ADMIN", "Administrator", "Built-in admin", true),
            role("r-accountant", "ACCOUNTANT", "Accountant", "Performs matching and reconciliation", false),
            role("r-reviewer", "REVIEWER", "Reviewer", "Reviews and approves journal entries", false),
            role("r-manager", "MANAGER", "Manager", "Oversees tasks and approvals", false),
            role("r-auditor", "AUDITOR", "Auditor", "Read-only oversight", false),
        ];

        let mut components = vec![
            component("cmp-dashboard", "DASHBOARD", "Dashboard", "/app/dashboard", "Analytics"),
            component("cmp-matcher", "MATCHER", "Matcher", "/app/matcher", "Reconciliation"),
            component("cmp-balancer", "BALANCER", "Balancer", "/app/balancer", "Reconciliation"),
            component("cmp-tasks", "TASK_MANAGER", "Task Manager", "/app/tasks", "Close Tasks"),
            component("cmp-journal", "JOURNAL_ENTRY", "Journal Entry", "/app/journal", "Accounting"),
            component("cmp-analytics", "ANALYTICS", "Analytics", "/app/analytics", "Analytics"),
            component("cmp-users", "USER_MGMT", "User Management", "/app/admin/users", "Admin"),
            component("cmp-roles", "ROLE_MGMT", "Role Management", "/app/admin/roles", "Admin"),
            component("cmp-perm", "PERMISSION_MGMT", "Permission Management", "/app/admin/permissions", "Admin"),
        ];
        components[0].description = Some("Landing overview".to_string());

        let actions: Vec<ActionDefinition> = ["VIEW", "VIEW_LIST", "CREATE", "EDIT", "DELETE", "APPROVE", "MANAGE"]
            .iter()
            .map(|code| ActionDefinition {
                id: format!("act-{}", code.to_ascii_lowercase().replace('_', "-")),
                code: code.to_string(),
                name: format!("ADMIN.PERMISSIONS.ACTION_{}", code),
            })
            .collect();

        let mut assignments = Vec::new();
        for role in &roles {
            for component in &components {
                match role.code.as_str() {
                    "ADMIN" => {
                        assignments.extend(actions.iter().map(|a| assignment(role, component, &a.code)));
                    }
                    "ACCOUNTANT"
                        if matches!(component.code.as_str(), "MATCHER" | "BALANCER" | "TASK_MANAGER") =>
                    {
                        assignments.push(assignment(role, component, "VIEW"));
                    }
                    _ => {}
                }
            }
        }

        Self {
            state: RwLock::new(CatalogState {
                roles,
                components,
                actions,
                assignments,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Roles

    pub fn roles(&self) -> Vec<RoleDefinition> {
        self.read().roles.clone()
    }

    pub fn create_role(&self, input: RoleInput) -> Result<RoleDefinition, RbacError> {
        let code = non_blank(input.code)
            .map(|c| normalize_code(&c))
            .ok_or_else(|| RbacError::Invalid("Role code is required.".to_string()))?;

        let mut state = self.write();
        if state.roles.iter().any(|r| r.code == code) {
            return Err(RbacError::Conflict(format!("Role code '{}' already exists.", code)));
        }

        let role = RoleDefinition {
            id: format!("role-{}", Uuid::new_v4().simple()),
            code,
            name: non_blank(input.name).unwrap_or_else(|| "New role".to_string()),
            description: non_blank(input.description),
            is_system: false,
            is_active: true,
        };
        state.roles.push(role.clone());
        Ok(role)
    }

    pub fn update_role(&self, id: &str, input: RoleInput) -> Result<RoleDefinition, RbacError> {
        let mut state = self.write();
        let new_code = non_blank(input.code).map(|c| normalize_code(&c));

        if let Some(code) = &new_code {
            if state.roles.iter().any(|r| r.id != id && &r.code == code) {
                return Err(RbacError::Conflict(format!("Role code '{}' already exists.", code)));
            }
        }

        let role = state
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RbacError::NotFound(format!("role '{}'", id)))?;

        if let Some(code) = new_code {
            if role.is_system && code != role.code {
                return Err(RbacError::Forbidden("System roles cannot be renamed.".to_string()));
            }
            role.code = code;
        }
        if let Some(name) = non_blank(input.name) {
            role.name = name;
        }
        if input.description.is_some() {
            role.description = non_blank(input.description);
        }
        Ok(role.clone())
    }

    pub fn set_role_active(&self, id: &str, active: bool) -> Result<RoleDefinition, RbacError> {
        let mut state = self.write();
        let role = state
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RbacError::NotFound(format!("role '{}'", id)))?;

        if role.is_system && !active {
            return Err(RbacError::Forbidden("System roles cannot be deactivated.".to_string()));
        }
        role.is_active = active;
        Ok(role.clone())
    }

    // Components

    pub fn components(&self) -> Vec<ComponentResource> {
        self.read().components.clone()
    }

    pub fn create_component(&self, input: ComponentInput) -> Result<ComponentResource, RbacError> {
        let code = non_blank(input.code)
            .map(|c| normalize_code(&c))
            .ok_or_else(|| RbacError::Invalid("Component code is required.".to_string()))?;

        let mut state = self.write();
        if state.components.iter().any(|c| c.code == code) {
            return Err(RbacError::Conflict(format!("Component code '{}' already exists.", code)));
        }

        let component = ComponentResource {
            id: format!("cmp-{}", Uuid::new_v4().simple()),
            code,
            name: non_blank(input.name).unwrap_or_else(|| "New component".to_string()),
            route_path: non_blank(input.route_path).unwrap_or_else(|| "/".to_string()),
            category: non_blank(input.category),
            description: non_blank(input.description),
            is_active: true,
        };
        state.components.push(component.clone());
        Ok(component)
    }

    pub fn update_component(&self, id: &str, input: ComponentInput) -> Result<ComponentResource, RbacError> {
        let mut state = self.write();
        let new_code = non_blank(input.code).map(|c| normalize_code(&c));

        if let Some(code) = &new_code {
            if state.components.iter().any(|c| c.id != id && &c.code == code) {
                return Err(RbacError::Conflict(format!("Component code '{}' already exists.", code)));
            }
        }

        let component = state
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RbacError::NotFound(format!("component '{}'", id)))?;

        let code_changed = new_code.as_ref().is_some_and(|c| *c != component.code);
        if let Some(code) = new_code {
            component.code = code;
        }
        if let Some(name) = non_blank(input.name) {
            component.name = name;
        }
        if let Some(route) = non_blank(input.route_path) {
            component.route_path = route;
        }
        if input.category.is_some() {
            component.category = non_blank(input.category);
        }
        if input.description.is_some() {
            component.description = non_blank(input.description);
        }
        let updated = component.clone();

        // Permission codes embed the component code.
        if code_changed {
            for a in state.assignments.iter_mut().filter(|a| a.component_id == updated.id) {
                a.permission_code = format!("{}.{}", updated.code, a.action_code);
            }
        }
        Ok(updated)
    }

    pub fn set_component_active(&self, id: &str, active: bool) -> Result<ComponentResource, RbacError> {
        let mut state = self.write();
        let component = state
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RbacError::NotFound(format!("component '{}'", id)))?;
        component.is_active = active;
        Ok(component.clone())
    }

    // Actions and matrix

    pub fn actions(&self) -> Vec<ActionDefinition> {
        self.read().actions.clone()
    }

    pub fn matrix(&self) -> Vec<PermissionAssignment> {
        self.read().assignments.clone()
    }

    /// Replace the whole matrix. Ids and permission codes are recomputed from
    /// the referenced role, component and action; duplicates collapse.
    pub fn save_matrix(&self, input: Vec<PermissionAssignment>) -> Result<Vec<PermissionAssignment>, RbacError> {
        let mut state = self.write();
        let mut seen = HashSet::new();
        let mut next = Vec::with_capacity(input.len());

        for item in input {
            let role = state
                .roles
                .iter()
                .find(|r| r.id == item.role_id)
                .ok_or_else(|| RbacError::NotFound(format!("role '{}'", item.role_id)))?;
            let component = state
                .components
                .iter()
                .find(|c| c.id == item.component_id)
                .ok_or_else(|| RbacError::NotFound(format!("component '{}'", item.component_id)))?;
            let action_code = normalize_code(&item.action_code);
            if !state.actions.iter().any(|a| a.code == action_code) {
                return Err(RbacError::NotFound(format!("action '{}'", item.action_code)));
            }

            let built = assignment(role, component, &action_code);
            if seen.insert(built.id.clone()) {
                next.push(built);
            }
        }

        state.assignments = next.clone();
        Ok(next)
    }

    /// Permission codes granted to a role code by the matrix.
    pub fn permissions_for_role(&self, role_code: &str) -> Vec<String> {
        let state = self.read();
        let code = normalize_code(role_code);
        let Some(role) = state.roles.iter().find(|r| r.code == code && r.is_active) else {
            return Vec::new();
        };
        state
            .assignments
            .iter()
            .filter(|a| a.role_id == role.id)
            .map(|a| a.permission_code.clone())
            .collect()
    }
}
