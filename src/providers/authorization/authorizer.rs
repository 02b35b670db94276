use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{DomainError, DomainResult, InternalError};
use crate::types::internal::RequestContext;

use super::requirement::{AuthorizationDecision, AuthorizationRecord, AuthorizationRequirement};

/// Resolves the authorization record of a user; `None` when the user is unknown or inactive
#[async_trait]
pub trait UserAuthorizationProvider: Send + Sync {
    async fn fetch(&self, user_id: &str) -> Result<Option<AuthorizationRecord>, InternalError>;
}

/// Decides whether the principal of a request satisfies a requirement
pub struct PermissionAuthorizer {
    provider: Arc<dyn UserAuthorizationProvider>,
}

impl PermissionAuthorizer {
    pub fn new(provider: Arc<dyn UserAuthorizationProvider>) -> Self {
        Self { provider }
    }

    /// Evaluate `requirement` for the principal in `ctx`
    ///
    /// # Returns
    /// * `Ok(AuthorizationDecision)` - The decision, granted or not
    /// * `Err(InternalError)` - The record could not be loaded
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        requirement: &AuthorizationRequirement,
    ) -> Result<AuthorizationDecision, InternalError> {
        let Some(user_id) = ctx.user_id() else {
            return Ok(requirement.evaluate(false, None));
        };

        let record = self.provider.fetch(user_id).await?;
        Ok(requirement.evaluate(true, record.as_ref()))
    }

    /// Like `decide`, but turns a refusal into a domain error
    pub async fn authorize(&self, ctx: &RequestContext, requirement: &AuthorizationRequirement) -> DomainResult<()> {
        let decision = self.decide(ctx, requirement).await?;

        if decision.is_granted() {
            tracing::debug!(
                request_id = %ctx.request_id,
                actor = %ctx.actor_id,
                "Authorization granted for {}",
                requirement
            );
            return Ok(());
        }

        tracing::warn!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            "Authorization denied for {}: {}",
            requirement,
            decision
        );

        let error = match decision {
            AuthorizationDecision::Unauthenticated => {
                DomainError::unauthorized("Auth.Unauthenticated", "A valid bearer token is required")
            }
            AuthorizationDecision::RecordNotFound => {
                DomainError::forbidden("Auth.RecordNotFound", "The account is unknown or inactive")
            }
            AuthorizationDecision::MissingPermission(p) => {
                DomainError::forbidden("Auth.MissingPermission", format!("Permission \"{}\" is required", p))
            }
            AuthorizationDecision::MissingPolicy(p) => {
                DomainError::forbidden("Auth.MissingPolicy", format!("Policy \"{}\" is required", p))
            }
            AuthorizationDecision::MissingRole(r) => {
                DomainError::forbidden("Auth.MissingRole", format!("Role \"{}\" is required", r))
            }
            AuthorizationDecision::Granted => return Ok(()),
        };
        Err(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::types::internal::auth::Claims;
    use std::collections::HashMap;

    struct FixedRecords(HashMap<String, AuthorizationRecord>);

    #[async_trait]
    impl UserAuthorizationProvider for FixedRecords {
        async fn fetch(&self, user_id: &str) -> Result<Option<AuthorizationRecord>, InternalError> {
            Ok(self.0.get(user_id).cloned())
        }
    }

    fn authenticated(user_id: &str) -> RequestContext {
        RequestContext::new().with_auth(Claims {
            sub: user_id.to_string(),
            name: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        })
    }

    fn authorizer() -> PermissionAuthorizer {
        let mut records = HashMap::new();
        records.insert(
            "customer".to_string(),
            AuthorizationRecord::new(["todos.view"], Vec::<String>::new(), ["Customer"]),
        );
        PermissionAuthorizer::new(Arc::new(FixedRecords(records)))
    }

    #[tokio::test]
    async fn test_unauthenticated_is_401() {
        let errors = authorizer()
            .authorize(&RequestContext::new(), &AuthorizationRequirement::new())
            .await
            .unwrap_err();

        assert_eq!(errors.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_unknown_user_is_forbidden() {
        let errors = authorizer()
            .authorize(&authenticated("ghost"), &AuthorizationRequirement::new())
            .await
            .unwrap_err();

        assert_eq!(errors.first().code, "Auth.RecordNotFound");
    }

    #[tokio::test]
    async fn test_missing_role_is_forbidden() {
        let requirement = AuthorizationRequirement::new().permission("todos.view").role("Administrator");

        let errors = authorizer()
            .authorize(&authenticated("customer"), &requirement)
            .await
            .unwrap_err();

        assert_eq!(errors.kind(), ErrorKind::Forbidden);
        assert_eq!(errors.first().code, "Auth.MissingRole");
    }

    #[tokio::test]
    async fn test_satisfied_requirement_granted() {
        let requirement = AuthorizationRequirement::new().permission("todos.view");

        assert!(authorizer().authorize(&authenticated("customer"), &requirement).await.is_ok());
    }
}
