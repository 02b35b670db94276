use std::collections::BTreeSet;
use std::fmt;

/// What the current principal holds, resolved from its roles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRecord {
    pub permissions: BTreeSet<String>,
    pub policies: BTreeSet<String>,
    pub roles: BTreeSet<String>,
}

impl AuthorizationRecord {
    pub fn new<P, Q, R>(permissions: P, policies: Q, roles: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            policies: policies.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of evaluating a requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Granted,
    Unauthenticated,
    RecordNotFound,
    MissingPermission(String),
    MissingPolicy(String),
    MissingRole(String),
}

impl AuthorizationDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationDecision::Granted)
    }
}

impl fmt::Display for AuthorizationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationDecision::Granted => write!(f, "granted"),
            AuthorizationDecision::Unauthenticated => write!(f, "unauthenticated"),
            AuthorizationDecision::RecordNotFound => write!(f, "no authorization record"),
            AuthorizationDecision::MissingPermission(p) => write!(f, "missing permission {}", p),
            AuthorizationDecision::MissingPolicy(p) => write!(f, "missing policy {}", p),
            AuthorizationDecision::MissingRole(r) => write!(f, "missing role {}", r),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid requirement segment \"{0}\"")]
pub struct RequirementParseError(pub String);

/// Permissions, policies and roles an operation needs; all must be held
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRequirement {
    permissions: Vec<String>,
    policies: Vec<String>,
    roles: Vec<String>,
}

fn push_unique(target: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !target.contains(&value) {
        target.push(value);
    }
}

impl AuthorizationRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        push_unique(&mut self.permissions, permission);
        self
    }

    pub fn permissions<I: IntoIterator<Item = S>, S: Into<String>>(mut self, permissions: I) -> Self {
        for p in permissions {
            push_unique(&mut self.permissions, p);
        }
        self
    }

    pub fn policy(mut self, policy: impl Into<String>) -> Self {
        push_unique(&mut self.policies, policy);
        self
    }

    pub fn policies<I: IntoIterator<Item = S>, S: Into<String>>(mut self, policies: I) -> Self {
        for p in policies {
            push_unique(&mut self.policies, p);
        }
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        push_unique(&mut self.roles, role);
        self
    }

    pub fn roles<I: IntoIterator<Item = S>, S: Into<String>>(mut self, roles: I) -> Self {
        for r in roles {
            push_unique(&mut self.roles, r);
        }
        self
    }

    pub fn required_permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn required_policies(&self) -> &[String] {
        &self.policies
    }

    pub fn required_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.policies.is_empty() && self.roles.is_empty()
    }

    /// Parse a route requirement such as `perm:todos.view,todos.edit;policy:CanPurge;role:Administrator`
    ///
    /// An empty string means "authenticated, nothing else".
    pub fn from_policy_name(name: &str) -> Result<Self, RequirementParseError> {
        let mut requirement = Self::new();

        for segment in name.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (kind, values) = segment
                .split_once(':')
                .ok_or_else(|| RequirementParseError(segment.to_string()))?;
            let values: Vec<&str> = values.split(',').map(str::trim).filter(|v| !v.is_empty()).collect();
            if values.is_empty() {
                return Err(RequirementParseError(segment.to_string()));
            }

            requirement = match kind.trim() {
                "perm" => requirement.permissions(values),
                "policy" => requirement.policies(values),
                "role" => requirement.roles(values),
                _ => return Err(RequirementParseError(segment.to_string())),
            };
        }

        Ok(requirement)
    }

    /// Render back to the form accepted by `from_policy_name`
    pub fn policy_name(&self) -> String {
        let mut segments = Vec::new();
        if !self.permissions.is_empty() {
            segments.push(format!("perm:{}", self.permissions.join(",")));
        }
        if !self.policies.is_empty() {
            segments.push(format!("policy:{}", self.policies.join(",")));
        }
        if !self.roles.is_empty() {
            segments.push(format!("role:{}", self.roles.join(",")));
        }
        segments.join(";")
    }

    /// Pure set containment: permissions, then policies, then roles; stops at the first gap
    pub fn evaluate(&self, authenticated: bool, record: Option<&AuthorizationRecord>) -> AuthorizationDecision {
        if !authenticated {
            return AuthorizationDecision::Unauthenticated;
        }
        let Some(record) = record else {
            return AuthorizationDecision::RecordNotFound;
        };

        if let Some(missing) = self.permissions.iter().find(|p| !record.permissions.contains(*p)) {
            return AuthorizationDecision::MissingPermission(missing.clone());
        }
        if let Some(missing) = self.policies.iter().find(|p| !record.policies.contains(*p)) {
            return AuthorizationDecision::MissingPolicy(missing.clone());
        }
        if let Some(missing) = self.roles.iter().find(|r| !record.roles.contains(*r)) {
            return AuthorizationDecision::MissingRole(missing.clone());
        }

        AuthorizationDecision::Granted
    }
}

impl fmt::Display for AuthorizationRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "authenticated")
        } else {
            f.write_str(&self.policy_name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AuthorizationRecord {
        AuthorizationRecord::new(
            ["todos.view", "todos.purge"],
            ["CanPurge"],
            ["Administrator"],
        )
    }

    #[test]
    fn test_empty_requirement_needs_only_authentication() {
        let requirement = AuthorizationRequirement::new();

        assert_eq!(requirement.evaluate(true, Some(&record())), AuthorizationDecision::Granted);
        assert_eq!(requirement.evaluate(false, Some(&record())), AuthorizationDecision::Unauthenticated);
    }

    #[test]
    fn test_missing_record() {
        let requirement = AuthorizationRequirement::new().permission("todos.view");

        assert_eq!(requirement.evaluate(true, None), AuthorizationDecision::RecordNotFound);
    }

    #[test]
    fn test_permissions_checked_before_policies_and_roles() {
        let requirement = AuthorizationRequirement::new()
            .role("Auditor")
            .policy("CanExport")
            .permission("logs.view");

        assert_eq!(
            requirement.evaluate(true, Some(&record())),
            AuthorizationDecision::MissingPermission("logs.view".to_string())
        );
    }

    #[test]
    fn test_policy_name_round_trip() {
        let requirement =
            AuthorizationRequirement::from_policy_name("perm:todos.view,todos.purge;policy:CanPurge;role:Administrator")
                .unwrap();

        assert_eq!(requirement.required_permissions(), ["todos.view", "todos.purge"]);
        assert_eq!(
            requirement.policy_name(),
            "perm:todos.view,todos.purge;policy:CanPurge;role:Administrator"
        );
        assert_eq!(requirement.evaluate(true, Some(&record())), AuthorizationDecision::Granted);
    }

    #[test]
    fn test_invalid_policy_names_rejected() {
        assert!(AuthorizationRequirement::from_policy_name("perm").is_err());
        assert!(AuthorizationRequirement::from_policy_name("group:x").is_err());
        assert!(AuthorizationRequirement::from_policy_name("perm:").is_err());
        assert!(AuthorizationRequirement::from_policy_name("").unwrap().is_empty());
    }
}
