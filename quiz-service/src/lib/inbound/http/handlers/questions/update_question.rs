use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::question::errors::QuestionError;
use crate::domain::question::models::AnswerIndex;
use crate::domain::question::models::QuestionId;
use crate::domain::question::models::UpdateQuestionCommand;
use crate::domain::question::ports::QuestionServicePort;
use crate::inbound::http::handlers::questions::create_question::parse_answers;
use crate::inbound::http::handlers::questions::QuestionResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuestionRequest>,
) -> Result<ApiSuccess<QuestionResponseData>, ApiError> {
    let question_id = QuestionId::from_string(&id).map_err(QuestionError::from)?;

    let answers = body.answers.map(parse_answers).transpose()?;
    let correct = body
        .correct
        .map(AnswerIndex::new)
        .transpose()
        .map_err(QuestionError::from)?;

    let command = UpdateQuestionCommand {
        ask: body.ask,
        answers,
        correct,
    };

    state
        .question_service
        .update_question(&question_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref question| ApiSuccess::new(StatusCode::OK, question.into()))
}

/// HTTP request body for a partial question update (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateQuestionRequest {
    ask: Option<String>,
    answers: Option<Vec<String>>,
    correct: Option<i16>,
}
