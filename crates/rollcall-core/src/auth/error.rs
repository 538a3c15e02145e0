use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Corrupt token: {0}")]
    CorruptToken(String),

    #[error("A login is already in progress")]
    LoginInProgress,

    #[error("Token store error: {0}")]
    Store(String),
}

impl AuthError {
    /// Wrap any store-side failure, keeping only its message.
    pub fn store(err: impl std::fmt::Display) -> Self {
        AuthError::Store(err.to_string())
    }
}
