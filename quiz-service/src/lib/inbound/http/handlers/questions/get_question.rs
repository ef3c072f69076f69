use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::question::errors::QuestionError;
use crate::domain::question::models::QuestionId;
use crate::domain::question::ports::QuestionServicePort;
use crate::inbound::http::handlers::questions::QuestionResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<QuestionResponseData>, ApiError> {
    let question_id = QuestionId::from_string(&id).map_err(QuestionError::from)?;

    state
        .question_service
        .get_question(&question_id)
        .await
        .map_err(ApiError::from)
        .map(|ref question| ApiSuccess::new(StatusCode::OK, question.into()))
}
