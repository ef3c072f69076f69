use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::domain::question::errors::AnswerIndexError;
use crate::domain::question::errors::QuestionIdError;
use crate::domain::question::models::AnswerIndex;
use crate::domain::question::models::QuestionId;
use crate::domain::question::models::SubmittedAnswer;
use crate::domain::question::ports::QuestionServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn submit_answers(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(body): Json<SubmitAnswersRequest>,
) -> Result<ApiSuccess<SubmitAnswersResponseData>, ApiError> {
    let answers = body
        .answers
        .into_iter()
        .map(SubmittedAnswerRequest::try_into_domain)
        .collect::<Result<Vec<_>, _>>()?;

    state
        .question_service
        .submit_answers(&auth_user.user.id, answers)
        .await
        .map_err(ApiError::from)
        .map(|total_score| {
            ApiSuccess::new(StatusCode::OK, SubmitAnswersResponseData { total_score })
        })
}

/// HTTP request body for submitting a round of answers (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitAnswersRequest {
    answers: Vec<SubmittedAnswerRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmittedAnswerRequest {
    question_id: String,
    answer: i16,
}

#[derive(Debug, Clone, Error)]
enum ParseSubmitAnswersRequestError {
    #[error("Invalid question id: {0}")]
    QuestionId(#[from] QuestionIdError),

    #[error("Invalid answer: {0}")]
    Answer(#[from] AnswerIndexError),
}

impl SubmittedAnswerRequest {
    fn try_into_domain(self) -> Result<SubmittedAnswer, ParseSubmitAnswersRequestError> {
        let question_id = QuestionId::from_string(&self.question_id)?;
        let answer = AnswerIndex::new(self.answer)?;
        Ok(SubmittedAnswer {
            question_id,
            answer,
        })
    }
}

impl From<ParseSubmitAnswersRequestError> for ApiError {
    fn from(err: ParseSubmitAnswersRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitAnswersResponseData {
    pub total_score: i32,
}
