use crate::errors::DomainResult;
use crate::providers::authorization::permissions;
use crate::types::internal::roles::{CreateRole, SetRoleClaims};

use super::{ValidationErrors, check_max_length, check_required_text};

pub fn validate_create_role(command: &CreateRole) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    check_required_text(&mut errors, "Name", &command.name, 64);
    if let Some(description) = &command.description {
        check_max_length(&mut errors, "Description", description, 256);
    }
    errors.finish()
}

pub fn validate_role_claims(command: &SetRoleClaims) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    for permission in &command.permissions {
        errors.check(
            permissions::is_known_permission(permission),
            "Permission.Unknown",
            format!("Permission \"{}\" does not exist", permission),
        );
    }
    for policy in &command.policies {
        check_required_text(&mut errors, "Policy", policy, 128);
    }
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_permission_rejected() {
        let errors = validate_role_claims(&SetRoleClaims {
            role_id: "r".to_string(),
            permissions: vec![permissions::TODOS_VIEW.to_string(), "todos.fly".to_string()],
            policies: vec![],
        })
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_code("Permission.Unknown"));
    }
}
