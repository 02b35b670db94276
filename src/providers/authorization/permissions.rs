//! Permission, policy and role names known to the application

pub const TODOS_VIEW: &str = "todos.view";
pub const TODOS_CREATE: &str = "todos.create";
pub const TODOS_EDIT: &str = "todos.edit";
pub const TODOS_DELETE: &str = "todos.delete";
pub const TODOS_PURGE: &str = "todos.purge";
pub const LOGS_VIEW: &str = "logs.view";
pub const ACCOUNTS_VIEW: &str = "accounts.view";
pub const ACCOUNTS_MANAGE: &str = "accounts.manage";
pub const ROLES_VIEW: &str = "roles.view";
pub const ROLES_MANAGE: &str = "roles.manage";
pub const PROFILE_EDIT: &str = "profile.edit";

pub const ALL_PERMISSIONS: &[&str] = &[
    TODOS_VIEW,
    TODOS_CREATE,
    TODOS_EDIT,
    TODOS_DELETE,
    TODOS_PURGE,
    LOGS_VIEW,
    ACCOUNTS_VIEW,
    ACCOUNTS_MANAGE,
    ROLES_VIEW,
    ROLES_MANAGE,
    PROFILE_EDIT,
];

pub const POLICY_CAN_PURGE: &str = "CanPurge";

pub const ROLE_ADMINISTRATOR: &str = "Administrator";
pub const ROLE_CUSTOMER: &str = "Customer";

/// Permissions granted to the seeded Customer role
pub const CUSTOMER_PERMISSIONS: &[&str] = &[TODOS_VIEW, TODOS_CREATE, TODOS_EDIT, TODOS_DELETE, PROFILE_EDIT];

pub fn is_known_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
}

/// Route requirements, in the `perm:...;policy:...;role:...` form
pub mod routes {
    pub const AUTHENTICATED: &str = "";
    pub const TODOS_VIEW: &str = "perm:todos.view";
    pub const TODOS_CREATE: &str = "perm:todos.create";
    pub const TODOS_EDIT: &str = "perm:todos.edit";
    pub const TODOS_DELETE: &str = "perm:todos.delete";
    pub const TODOS_PURGE: &str = "perm:todos.purge;policy:CanPurge;role:Administrator";
    pub const LOGS_VIEW: &str = "perm:logs.view";
    pub const ACCOUNTS_VIEW: &str = "perm:accounts.view";
    pub const ACCOUNTS_MANAGE: &str = "perm:accounts.manage";
    pub const ACCOUNTS_ASSIGN_ROLES: &str = "perm:accounts.manage,roles.view";
    pub const ROLES_VIEW: &str = "perm:roles.view";
    pub const ROLES_MANAGE: &str = "perm:roles.manage";
    pub const PROFILE_EDIT: &str = "perm:profile.edit";
}
