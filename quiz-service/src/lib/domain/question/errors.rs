use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Error for QuestionId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuestionIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for AnswerIndex validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnswerIndexError {
    #[error("Answer index out of range: expected 1-4, got {0}")]
    OutOfRange(i16),
}

/// Top-level error for all question-related operations
#[derive(Debug, Clone, Error)]
pub enum QuestionError {
    #[error("Invalid question ID: {0}")]
    InvalidQuestionId(#[from] QuestionIdError),

    #[error("Invalid answer index: {0}")]
    InvalidAnswerIndex(#[from] AnswerIndexError),

    #[error("Question not found: {0}")]
    NotFound(String),

    #[error("Score update failed: {0}")]
    ScoreUpdateFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<UserError> for QuestionError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => QuestionError::ScoreUpdateFailed(id),
            UserError::DatabaseError(msg) => QuestionError::DatabaseError(msg),
            other => QuestionError::Unknown(other.to_string()),
        }
    }
}
