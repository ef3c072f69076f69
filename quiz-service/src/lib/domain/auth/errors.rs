use thiserror::Error;

use crate::domain::token::errors::TokenStoreError;
use crate::domain::user::errors::UserError;

/// Error type for notification delivery.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    #[error("Failed to send message: {0}")]
    SendFailed(String),
}

/// Top-level error for authentication flows.
///
/// `Unauthenticated` is deliberately coarse: expired, malformed, wrong-kind,
/// consumed, and owner-missing all surface identically so callers cannot
/// probe which internal check failed.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(email) => AuthError::Duplicate(email),
            UserError::NotFound(id) => AuthError::NotFound(id),
            UserError::DatabaseError(msg) => AuthError::DatabaseError(msg),
            other => AuthError::Unknown(other.to_string()),
        }
    }
}

impl From<TokenStoreError> for AuthError {
    fn from(err: TokenStoreError) -> Self {
        match err {
            TokenStoreError::NotFound(token) => AuthError::NotFound(token),
            TokenStoreError::DatabaseError(msg) => AuthError::DatabaseError(msg),
        }
    }
}
