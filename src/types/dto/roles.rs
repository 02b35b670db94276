use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::roles::RoleView;

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Replaces every claim of a role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetRoleClaimsRequest {
    #[oai(default)]
    pub permissions: Vec<String>,
    #[oai(default)]
    pub policies: Vec<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub policies: Vec<String>,
}

impl From<RoleView> for RoleResponse {
    fn from(view: RoleView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            description: view.description,
            permissions: view.permissions,
            policies: view.policies,
        }
    }
}
