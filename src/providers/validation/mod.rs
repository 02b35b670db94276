// Request validation - collects every failure before a handler body runs
pub mod accounts;
pub mod roles;
pub mod todo;

use crate::errors::{DomainError, DomainErrors, DomainResult};

/// Accumulates validation failures as `<Field>.<Rule>` codes
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<DomainError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless `valid` holds
    pub fn check(&mut self, valid: bool, code: &str, description: impl Into<String>) -> &mut Self {
        if !valid {
            self.errors.push(DomainError::validation(code, description));
        }
        self
    }

    pub fn push(&mut self, error: DomainError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> DomainResult<()> {
        match DomainErrors::from_vec(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }
}

/// Required, trimmed non-empty, at most `max` characters
pub(crate) fn check_required_text(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.check(false, &format!("{}.Required", field), format!("{} is required", field));
    } else {
        check_max_length(errors, field, value, max);
    }
}

pub(crate) fn check_max_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    errors.check(
        value.chars().count() <= max,
        &format!("{}.TooLong", field),
        format!("{} must not exceed {} characters", field, max),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_failure_in_order() {
        let mut errors = ValidationErrors::new();
        check_required_text(&mut errors, "Title", "  ", 10);
        check_max_length(&mut errors, "Note", "abcdef", 3);

        let result = errors.finish().unwrap_err();
        let codes: Vec<&str> = result.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["Title.Required", "Note.TooLong"]);
    }

    #[test]
    fn test_no_failures_is_ok() {
        let mut errors = ValidationErrors::new();
        check_required_text(&mut errors, "Title", "Spring drop", 200);

        assert!(errors.finish().is_ok());
    }
}
