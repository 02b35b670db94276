// Errors layer - Error type definitions
pub mod api;
pub mod domain;
pub mod internal;

// Re-exports for convenience
pub use api::ApiError;
pub use domain::{DomainError, DomainErrors, DomainResult, ErrorKind};
pub use internal::InternalError;
