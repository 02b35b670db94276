// Permission-based authorization decision
pub mod authorizer;
pub mod permissions;
pub mod requirement;

pub use authorizer::{PermissionAuthorizer, UserAuthorizationProvider};
pub use requirement::{AuthorizationDecision, AuthorizationRecord, AuthorizationRequirement, RequirementParseError};
