use thiserror::Error;

pub mod credential;
pub mod database;
pub mod storage;
pub mod token;

pub use credential::CredentialError;
pub use database::DatabaseError;
pub use storage::StorageError;
pub use token::TokenError;

/// Internal error type for store and provider operations
///
/// Not exposed via API - coordinators convert it into `DomainErrors`,
/// which logs the details and hides them from the caller.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_database_helper_keeps_operation_name() {
        let err = InternalError::database("find_user", DbErr::RecordNotFound("x".to_string()));

        assert!(err.to_string().contains("find_user"));
    }

    #[test]
    fn test_record_not_found_is_not_a_unique_violation() {
        let err = DatabaseError::Operation {
            operation: "insert".to_string(),
            source: DbErr::RecordNotFound("x".to_string()),
        };

        assert!(err.unique_violation().is_none());
    }

    #[test]
    fn test_token_error_converts_transparently() {
        let err: InternalError = TokenError::Expired.into();

        assert_eq!(err.to_string(), "Token has expired");
    }
}
