use std::sync::Arc;

use poem::Request;

use crate::app_data::AppData;
use crate::errors::{ApiError, DomainError, DomainErrors};
use crate::providers::authorization::AuthorizationRequirement;
use crate::providers::{PermissionAuthorizer, TokenProvider};
use crate::types::internal::RequestContext;

/// Runs at the top of every protected endpoint
///
/// Builds the request context from the bearer token and checks it against
/// the route's policy name (see `permissions::routes`).
#[derive(Clone)]
pub struct AccessGuard {
    token_provider: Arc<TokenProvider>,
    authorizer: Arc<PermissionAuthorizer>,
}

impl AccessGuard {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            authorizer: app_data.authorizer.clone(),
        }
    }

    /// Context for the request without any authorization check
    pub fn context(&self, req: &Request) -> RequestContext {
        RequestContext::from_request(req, &self.token_provider)
    }

    /// Authorize the request against `policy_name`, returning its context
    pub async fn check(&self, req: &Request, policy_name: &str) -> Result<RequestContext, ApiError> {
        let ctx = self.context(req);

        let requirement = AuthorizationRequirement::from_policy_name(policy_name).map_err(|e| {
            tracing::error!("Route policy '{}' is malformed: {}", policy_name, e);
            ApiError::from(DomainErrors::from(DomainError::unexpected()))
        })?;

        self.authorizer.authorize(&ctx, &requirement).await?;
        Ok(ctx)
    }
}
