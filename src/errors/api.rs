use std::fmt;

use poem_openapi::{ApiResponse, payload::Json};

use super::domain::{DomainErrors, ErrorKind};
use crate::types::dto::common::{ErrorEntry, ErrorResponse};

/// Error response returned by every endpoint
///
/// The status is chosen from the first domain error; every error entry is
/// returned in the body so validation failures are reported per field.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated but lacking a required permission, policy or role
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Business rule or uniqueness conflict
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    pub fn response(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json) => &json.0,
            ApiError::Unauthorized(json) => &json.0,
            ApiError::Forbidden(json) => &json.0,
            ApiError::NotFound(json) => &json.0,
            ApiError::Conflict(json) => &json.0,
            ApiError::InternalError(json) => &json.0,
        }
    }

    /// Codes of every error entry, in order
    pub fn codes(&self) -> Vec<String> {
        self.response().errors.iter().map(|e| e.code.clone()).collect()
    }
}

impl From<DomainErrors> for ApiError {
    fn from(errors: DomainErrors) -> Self {
        let kind = errors.kind();
        let status_code = match kind {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Failure => 500,
        };
        let body = Json(ErrorResponse {
            status_code,
            errors: errors
                .into_vec()
                .into_iter()
                .map(|e| ErrorEntry {
                    kind: e.kind.as_str().to_string(),
                    code: e.code,
                    description: e.description,
                })
                .collect(),
        });

        match kind {
            ErrorKind::Validation => ApiError::BadRequest(body),
            ErrorKind::Unauthorized => ApiError::Unauthorized(body),
            ErrorKind::Forbidden => ApiError::Forbidden(body),
            ErrorKind::NotFound => ApiError::NotFound(body),
            ErrorKind::Conflict => ApiError::Conflict(body),
            ErrorKind::Failure => ApiError::InternalError(body),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.status_code(), self.codes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_validation_errors_map_to_400_with_every_entry() {
        let errors = DomainErrors::from_vec(vec![
            DomainError::validation("Title.Required", "Title is required"),
            DomainError::validation("Colour.Unsupported", "Colour is not supported"),
        ])
        .unwrap();

        let api_error = ApiError::from(errors);

        assert!(matches!(api_error, ApiError::BadRequest(_)));
        assert_eq!(api_error.status_code(), 400);
        assert_eq!(api_error.codes(), vec!["Title.Required", "Colour.Unsupported"]);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api_error = ApiError::from(DomainErrors::from(DomainError::not_found(
            "TodoItem.NotFound",
            "missing",
        )));

        assert!(matches!(api_error, ApiError::NotFound(_)));
        assert_eq!(api_error.response().errors[0].kind, "not_found");
    }

    #[test]
    fn test_forbidden_and_failure_statuses() {
        let forbidden = ApiError::from(DomainErrors::from(DomainError::forbidden("Auth.MissingPermission", "x")));
        let failure = ApiError::from(DomainErrors::from(DomainError::unexpected()));

        assert_eq!(forbidden.status_code(), 403);
        assert_eq!(failure.status_code(), 500);
    }
}
