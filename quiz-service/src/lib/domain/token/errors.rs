use thiserror::Error;

/// Error type for token store operations.
#[derive(Debug, Clone, Error)]
pub enum TokenStoreError {
    #[error("Token record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
