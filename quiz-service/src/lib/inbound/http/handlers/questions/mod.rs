use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::question::models::Question;

pub mod create_question;
pub mod delete_question;
pub mod get_question;
pub mod list_questions;
pub mod update_question;

pub use create_question::create_question;
pub use delete_question::delete_question;
pub use get_question::get_question;
pub use list_questions::list_questions;
pub use update_question::update_question;

/// Question representation for admin endpoints, correct answer included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResponseData {
    pub id: String,
    pub ask: String,
    pub answers: Vec<String>,
    pub correct: i16,
    pub created_at: DateTime<Utc>,
}

impl From<&Question> for QuestionResponseData {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            ask: question.ask.clone(),
            answers: question.answers.to_vec(),
            correct: question.correct.value(),
            created_at: question.created_at,
        }
    }
}
