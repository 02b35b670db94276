use thiserror::Error;

/// Failures raised while issuing or validating tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid: {reason}")]
    Invalid { reason: String },

    #[error("Token could not be issued: {reason}")]
    Issue { reason: String },
}

impl TokenError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        TokenError::Invalid {
            reason: reason.into(),
        }
    }
}
