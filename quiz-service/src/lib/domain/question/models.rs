use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::question::errors::AnswerIndexError;
use crate::domain::question::errors::QuestionIdError;

/// Number of answer options every question carries.
pub const ANSWER_COUNT: usize = 4;

/// Question aggregate entity.
///
/// A multiple-choice question with four answers, one of them correct.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub ask: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct: AnswerIndex,
    pub created_at: DateTime<Utc>,
}

/// Question unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionId(pub Uuid);

impl QuestionId {
    /// Generate a new random question ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a question ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, QuestionIdError> {
        Uuid::parse_str(s)
            .map(QuestionId)
            .map_err(|e| QuestionIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One-based index into a question's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerIndex(i16);

impl AnswerIndex {
    /// Create a validated answer index.
    ///
    /// # Arguments
    /// * `value` - One-based index, must be within 1-4
    ///
    /// # Errors
    /// * `OutOfRange` - Index is outside 1-4
    pub fn new(value: i16) -> Result<Self, AnswerIndexError> {
        if (1..=ANSWER_COUNT as i16).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AnswerIndexError::OutOfRange(value))
        }
    }

    /// Get the raw one-based index.
    pub fn value(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for AnswerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new question with domain types
#[derive(Debug)]
pub struct CreateQuestionCommand {
    pub ask: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct: AnswerIndex,
}

/// Command to update an existing question with optional fields.
///
/// Only provided fields will be updated.
#[derive(Debug)]
pub struct UpdateQuestionCommand {
    pub ask: Option<String>,
    pub answers: Option<[String; ANSWER_COUNT]>,
    pub correct: Option<AnswerIndex>,
}

/// A single answer within a quiz submission.
#[derive(Debug, Clone, Copy)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub answer: AnswerIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_index_bounds() {
        for value in 1..=4 {
            assert!(AnswerIndex::new(value).is_ok());
        }
        assert_eq!(
            AnswerIndex::new(0),
            Err(AnswerIndexError::OutOfRange(0))
        );
        assert_eq!(
            AnswerIndex::new(5),
            Err(AnswerIndexError::OutOfRange(5))
        );
    }

    #[test]
    fn test_question_id_parsing() {
        let id = QuestionId::new();
        assert_eq!(QuestionId::from_string(&id.to_string()).unwrap(), id);
        assert!(QuestionId::from_string("not-a-uuid").is_err());
    }
}
