use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::question::errors::QuestionError;
use crate::domain::question::models::AnswerIndex;
use crate::domain::question::models::CreateQuestionCommand;
use crate::domain::question::models::Question;
use crate::domain::question::models::QuestionId;
use crate::domain::question::models::SubmittedAnswer;
use crate::domain::question::models::UpdateQuestionCommand;
use crate::domain::question::ports::QuestionRepository;
use crate::domain::question::ports::QuestionServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::normalize_page;

/// Domain service implementation for question CRUD and quiz play.
///
/// Needs the user repository as well: a scored submission is added to the
/// submitting user's accumulated total.
pub struct QuestionService<QR, UR>
where
    QR: QuestionRepository,
    UR: UserRepository,
{
    repository: Arc<QR>,
    user_repository: Arc<UR>,
}

impl<QR, UR> QuestionService<QR, UR>
where
    QR: QuestionRepository,
    UR: UserRepository,
{
    /// Create a new question service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Question persistence implementation
    /// * `user_repository` - User persistence implementation (score updates)
    pub fn new(repository: Arc<QR>, user_repository: Arc<UR>) -> Self {
        Self {
            repository,
            user_repository,
        }
    }
}

#[async_trait]
impl<QR, UR> QuestionServicePort for QuestionService<QR, UR>
where
    QR: QuestionRepository,
    UR: UserRepository,
{
    async fn create_question(
        &self,
        command: CreateQuestionCommand,
    ) -> Result<Question, QuestionError> {
        let question = Question {
            id: QuestionId::new(),
            ask: command.ask,
            answers: command.answers,
            correct: command.correct,
            created_at: Utc::now(),
        };

        self.repository.create(question).await
    }

    async fn get_question(&self, id: &QuestionId) -> Result<Question, QuestionError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(QuestionError::NotFound(id.to_string()))
    }

    async fn list_questions(&self, page: u32, size: u32) -> Result<Vec<Question>, QuestionError> {
        let (page, size) = normalize_page(page, size);
        self.repository.list(page, size).await
    }

    async fn update_question(
        &self,
        id: &QuestionId,
        command: UpdateQuestionCommand,
    ) -> Result<Question, QuestionError> {
        let mut question = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(QuestionError::NotFound(id.to_string()))?;

        if let Some(new_ask) = command.ask {
            question.ask = new_ask;
        }

        if let Some(new_answers) = command.answers {
            question.answers = new_answers;
        }

        if let Some(new_correct) = command.correct {
            question.correct = new_correct;
        }

        self.repository.update(question).await
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<(), QuestionError> {
        self.repository.delete(id).await
    }

    async fn submit_answers(
        &self,
        user_id: &UserId,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<i32, QuestionError> {
        let ids: Vec<QuestionId> = answers.iter().map(|a| a.question_id).collect();
        let questions = self.repository.find_by_ids(&ids).await?;

        let correct_by_id: HashMap<QuestionId, AnswerIndex> =
            questions.into_iter().map(|q| (q.id, q.correct)).collect();

        // Answers for unknown question ids simply do not score.
        let earned = answers
            .iter()
            .filter(|a| correct_by_id.get(&a.question_id) == Some(&a.answer))
            .count() as i32;

        let total = self.user_repository.add_score(user_id, earned).await?;

        tracing::debug!(user_id = %user_id, earned, total, "quiz submission scored");

        Ok(earned)
    }
}
