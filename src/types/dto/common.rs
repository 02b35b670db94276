use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// One failure reported by a handler
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error category (validation, not_found, conflict, ...)
    pub kind: String,

    /// Machine readable code, e.g. `TodoItem.NotFound`
    pub code: String,

    /// Human-readable message
    pub description: String,
}

/// Standardized error response model
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status_code: u16,

    /// Every error reported by the handler, in order
    pub errors: Vec<ErrorEntry>,
}

/// Response carrying only a message
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for commands that return nothing
#[derive(ApiResponse, Debug)]
pub enum NoContentResponse {
    /// The command succeeded
    #[oai(status = 204)]
    NoContent,
}
