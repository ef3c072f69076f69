use serde::Serialize;

use crate::domain::question::models::Question;

pub mod list_play_questions;
pub mod submit_answers;

pub use list_play_questions::list_play_questions;
pub use submit_answers::submit_answers;

/// Question as shown to a player, correct answer withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayQuestionData {
    pub id: String,
    pub ask: String,
    pub answers: Vec<String>,
}

impl From<&Question> for PlayQuestionData {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            ask: question.ask.clone(),
            answers: question.answers.to_vec(),
        }
    }
}
