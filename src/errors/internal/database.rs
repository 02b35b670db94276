use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}

impl DatabaseError {
    /// The unique constraint named by the database, if this is a uniqueness violation
    pub fn unique_violation(&self) -> Option<String> {
        let source = match self {
            DatabaseError::Operation { source, .. } => source,
            DatabaseError::TransactionBegin { source } => source,
            DatabaseError::TransactionCommit { source } => source,
        };
        match source.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(message)) => Some(message),
            _ => None,
        }
    }
}
