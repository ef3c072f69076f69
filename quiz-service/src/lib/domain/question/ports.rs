use async_trait::async_trait;

use crate::domain::question::errors::QuestionError;
use crate::domain::question::models::CreateQuestionCommand;
use crate::domain::question::models::Question;
use crate::domain::question::models::QuestionId;
use crate::domain::question::models::SubmittedAnswer;
use crate::domain::question::models::UpdateQuestionCommand;
use crate::domain::user::models::UserId;

/// Port for question domain service operations.
#[async_trait]
pub trait QuestionServicePort: Send + Sync + 'static {
    /// Create a new question.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_question(
        &self,
        command: CreateQuestionCommand,
    ) -> Result<Question, QuestionError>;

    /// Retrieve question by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Question does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_question(&self, id: &QuestionId) -> Result<Question, QuestionError>;

    /// Retrieve a page of questions ordered by creation time.
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `size` - Page size
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_questions(&self, page: u32, size: u32) -> Result<Vec<Question>, QuestionError>;

    /// Update existing question with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - Question does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_question(
        &self,
        id: &QuestionId,
        command: UpdateQuestionCommand,
    ) -> Result<Question, QuestionError>;

    /// Delete existing question.
    ///
    /// # Errors
    /// * `NotFound` - Question does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_question(&self, id: &QuestionId) -> Result<(), QuestionError>;

    /// Score a quiz submission and add the result to the user's total.
    ///
    /// One point per answer matching the stored correct index; answers for
    /// unknown question ids are skipped.
    ///
    /// # Arguments
    /// * `user_id` - Submitting user
    /// * `answers` - Submitted answers
    ///
    /// # Returns
    /// Points earned by this submission
    ///
    /// # Errors
    /// * `ScoreUpdateFailed` - User no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn submit_answers(
        &self,
        user_id: &UserId,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<i32, QuestionError>;
}

/// Persistence operations for question aggregate.
#[async_trait]
pub trait QuestionRepository: Send + Sync + 'static {
    /// Persist new question to storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, question: Question) -> Result<Question, QuestionError>;

    /// Retrieve question by identifier.
    ///
    /// # Returns
    /// Optional question entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, QuestionError>;

    /// Retrieve multiple questions by identifiers.
    ///
    /// # Returns
    /// Vector of found questions (missing ids are skipped without error)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_ids(&self, ids: &[QuestionId]) -> Result<Vec<Question>, QuestionError>;

    /// Retrieve a page of questions ordered by creation time (newest first).
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, page: u32, size: u32) -> Result<Vec<Question>, QuestionError>;

    /// Update existing question in storage.
    ///
    /// # Errors
    /// * `NotFound` - Question does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, question: Question) -> Result<Question, QuestionError>;

    /// Remove question from storage.
    ///
    /// # Errors
    /// * `NotFound` - Question does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &QuestionId) -> Result<(), QuestionError>;
}
