use std::fmt;

use serde::Serialize;

use super::internal::{CredentialError, InternalError, StorageError, TokenError};

/// Category of a domain error, used by the API layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    Failure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Failure => "failure",
        }
    }
}

/// A single expected failure returned by a handler
///
/// `code` is machine readable (`TodoItem.NotFound`, `Title.Required`),
/// `description` is meant for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub kind: ErrorKind,
    pub code: String,
    pub description: String,
}

impl DomainError {
    fn with_kind(kind: ErrorKind, code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn validation(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Validation, code, description)
    }

    pub fn not_found(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::NotFound, code, description)
    }

    pub fn conflict(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Conflict, code, description)
    }

    pub fn unauthorized(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Unauthorized, code, description)
    }

    pub fn forbidden(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Forbidden, code, description)
    }

    pub fn failure(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Failure, code, description)
    }

    /// Generic failure returned when infrastructure breaks; details stay in the logs
    pub fn unexpected() -> Self {
        Self::failure("General.Unexpected", "An unexpected error occurred")
    }

    /// Map an identity-layer failure, falling back to a generic code when none is given
    pub fn identity(code: Option<&str>, description: impl Into<String>) -> Self {
        Self::conflict(code.unwrap_or("Identity.Failure"), description)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// One or more domain errors; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainErrors(Vec<DomainError>);

impl DomainErrors {
    /// Build from a list, returning `None` when the list is empty
    pub fn from_vec(errors: Vec<DomainError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// The first error; it decides the HTTP status
    pub fn first(&self) -> &DomainError {
        &self.0[0]
    }

    pub fn kind(&self) -> ErrorKind {
        self.first().kind
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    pub fn into_vec(self) -> Vec<DomainError> {
        self.0
    }
}

impl fmt::Display for DomainErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.0.iter().map(|e| e.code.as_str()).collect();
        write!(f, "[{}]", codes.join(", "))
    }
}

impl std::error::Error for DomainErrors {}

impl From<DomainError> for DomainErrors {
    fn from(error: DomainError) -> Self {
        Self(vec![error])
    }
}

impl From<InternalError> for DomainErrors {
    /// Explicit conversion point from internal errors to handler results.
    /// Internal error details are logged but not exposed to clients.
    fn from(err: InternalError) -> Self {
        let error = match &err {
            InternalError::Token(TokenError::Expired) => {
                tracing::debug!("Expired token presented");
                DomainError::unauthorized("Auth.TokenExpired", "The token has expired")
            }
            InternalError::Token(TokenError::Invalid { reason }) => {
                tracing::debug!("Invalid token presented: {}", reason);
                DomainError::unauthorized("Auth.InvalidToken", "The token is invalid")
            }
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                DomainError::unauthorized("Auth.InvalidCredentials", "Username or password is incorrect")
            }
            InternalError::Credential(CredentialError::IncorrectPassword) => {
                DomainError::validation("Password.Incorrect", "The current password is incorrect")
            }
            InternalError::Credential(CredentialError::AccountInactive(user_id)) => {
                tracing::warn!("Inactive account {} attempted to authenticate", user_id);
                DomainError::forbidden("Auth.AccountInactive", "The account is not active")
            }
            InternalError::Credential(CredentialError::RefreshTokenRejected(reason)) => {
                tracing::debug!("Refresh token rejected: {}", reason);
                DomainError::unauthorized("Auth.InvalidRefreshToken", "The refresh token is invalid or expired")
            }
            InternalError::Storage(StorageError::NotFound(url)) => {
                tracing::debug!("Stored file not found: {}", url);
                DomainError::not_found("Storage.FileNotFound", "The requested file does not exist")
            }
            InternalError::Database(db_err) => match db_err.unique_violation() {
                Some(message) => {
                    tracing::warn!("Unique constraint violated: {}", message);
                    DomainError::identity(None, "A record with the same unique value already exists")
                }
                None => {
                    tracing::error!("Database failure: {}", err);
                    DomainError::unexpected()
                }
            },
            _ => {
                tracing::error!("Unexpected internal error: {}", err);
                DomainError::unexpected()
            }
        };
        error.into()
    }
}

/// Success-or-errors result returned by every command and query handler
pub type DomainResult<T> = Result<T, DomainErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_empty_list() {
        assert!(DomainErrors::from_vec(vec![]).is_none());
    }

    #[test]
    fn test_first_error_decides_kind() {
        let errors = DomainErrors::from_vec(vec![
            DomainError::not_found("TodoList.NotFound", "missing"),
            DomainError::validation("Title.Required", "required"),
        ])
        .unwrap();

        assert_eq!(errors.kind(), ErrorKind::NotFound);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_code("Title.Required"));
    }

    #[test]
    fn test_identity_failure_uses_fallback_code() {
        let error = DomainError::identity(None, "boom");
        assert_eq!(error.code, "Identity.Failure");

        let error = DomainError::identity(Some("User.DuplicateEmail"), "taken");
        assert_eq!(error.code, "User.DuplicateEmail");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let errors: DomainErrors = InternalError::parse("uuid", "garbage").into();

        assert_eq!(errors.first().code, "General.Unexpected");
        assert_eq!(errors.kind(), ErrorKind::Failure);
    }

    #[test]
    fn test_expired_token_maps_to_unauthorized() {
        let errors: DomainErrors = InternalError::Token(TokenError::Expired).into();

        assert_eq!(errors.kind(), ErrorKind::Unauthorized);
        assert_eq!(errors.first().code, "Auth.TokenExpired");
    }
}
