use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::question::errors::AnswerIndexError;
use crate::domain::question::models::AnswerIndex;
use crate::domain::question::models::CreateQuestionCommand;
use crate::domain::question::models::ANSWER_COUNT;
use crate::domain::question::ports::QuestionServicePort;
use crate::inbound::http::handlers::questions::QuestionResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn create_question(
    State(state): State<AppState>,
    Json(body): Json<CreateQuestionRequest>,
) -> Result<ApiSuccess<QuestionResponseData>, ApiError> {
    state
        .question_service
        .create_question(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref question| ApiSuccess::new(StatusCode::CREATED, question.into()))
}

/// HTTP request body for creating a question (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateQuestionRequest {
    ask: String,
    answers: Vec<String>,
    correct: i16,
}

#[derive(Debug, Clone, Error)]
pub(super) enum ParseQuestionRequestError {
    #[error("Expected exactly {ANSWER_COUNT} answers, got {0}")]
    WrongAnswerCount(usize),

    #[error("Invalid correct answer: {0}")]
    Correct(#[from] AnswerIndexError),
}

pub(super) fn parse_answers(
    answers: Vec<String>,
) -> Result<[String; ANSWER_COUNT], ParseQuestionRequestError> {
    let count = answers.len();
    answers
        .try_into()
        .map_err(|_| ParseQuestionRequestError::WrongAnswerCount(count))
}

impl CreateQuestionRequest {
    fn try_into_command(self) -> Result<CreateQuestionCommand, ParseQuestionRequestError> {
        let answers = parse_answers(self.answers)?;
        let correct = AnswerIndex::new(self.correct)?;
        Ok(CreateQuestionCommand {
            ask: self.ask,
            answers,
            correct,
        })
    }
}

impl From<ParseQuestionRequestError> for ApiError {
    fn from(err: ParseQuestionRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
