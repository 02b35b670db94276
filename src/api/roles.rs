use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::access_guard::AccessGuard;
use crate::coordinators::RoleCoordinator;
use crate::errors::ApiError;
use crate::providers::authorization::permissions::routes;
use crate::types::dto::common::NoContentResponse;
use crate::types::dto::roles::{CreateRoleRequest, RoleResponse, SetRoleClaimsRequest};
use crate::types::internal::roles::{CreateRole, SetRoleClaims};

/// Role management endpoints
pub struct RoleApi {
    guard: AccessGuard,
    coordinator: Arc<RoleCoordinator>,
}

impl RoleApi {
    pub fn new(guard: AccessGuard, coordinator: Arc<RoleCoordinator>) -> Self {
        Self { guard, coordinator }
    }
}

#[derive(Tags)]
enum RoleTags {
    /// Roles and their permission and policy claims
    Roles,
}

#[OpenApi(prefix_path = "/roles")]
impl RoleApi {
    #[oai(path = "/", method = "get", tag = "RoleTags::Roles")]
    async fn list(&self, req: &Request) -> Result<Json<Vec<RoleResponse>>, ApiError> {
        let ctx = self.guard.check(req, routes::ROLES_VIEW).await?;
        let roles = self.coordinator.list(&ctx).await?;
        Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
    }

    #[oai(path = "/", method = "post", tag = "RoleTags::Roles")]
    async fn create(&self, req: &Request, body: Json<CreateRoleRequest>) -> Result<Json<RoleResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::ROLES_MANAGE).await?;
        let body = body.0;
        let role = self
            .coordinator
            .create(
                &ctx,
                CreateRole {
                    name: body.name,
                    description: body.description,
                },
            )
            .await?;
        Ok(Json(role.into()))
    }

    #[oai(path = "/:id", method = "delete", tag = "RoleTags::Roles")]
    async fn delete(&self, req: &Request, id: Path<String>) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::ROLES_MANAGE).await?;
        self.coordinator.delete(&ctx, &id.0).await?;
        Ok(NoContentResponse::NoContent)
    }

    /// Replace every permission and policy claim of the role
    #[oai(path = "/:id/claims", method = "put", tag = "RoleTags::Roles")]
    async fn set_claims(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<SetRoleClaimsRequest>,
    ) -> Result<Json<RoleResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::ROLES_MANAGE).await?;
        let body = body.0;
        let role = self
            .coordinator
            .set_claims(
                &ctx,
                SetRoleClaims {
                    role_id: id.0,
                    permissions: body.permissions,
                    policies: body.policies,
                },
            )
            .await?;
        Ok(Json(role.into()))
    }
}
