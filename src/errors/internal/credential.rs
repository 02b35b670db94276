use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Account {0} is not active")]
    AccountInactive(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("Refresh token rejected: {0}")]
    RefreshTokenRejected(String),
}
