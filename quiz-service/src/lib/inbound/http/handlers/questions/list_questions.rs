use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::question::ports::QuestionServicePort;
use crate::inbound::http::handlers::questions::QuestionResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListQuestionsQuery>,
) -> Result<ApiSuccess<Vec<QuestionResponseData>>, ApiError> {
    state
        .question_service
        .list_questions(params.page.unwrap_or(1), params.size.unwrap_or(0))
        .await
        .map_err(ApiError::from)
        .map(|questions| {
            ApiSuccess::new(
                StatusCode::OK,
                questions.iter().map(QuestionResponseData::from).collect(),
            )
        })
}

/// Pagination parameters; the service clamps out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListQuestionsQuery {
    page: Option<u32>,
    size: Option<u32>,
}
