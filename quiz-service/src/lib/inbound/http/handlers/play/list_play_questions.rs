use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::question::ports::QuestionServicePort;
use crate::inbound::http::handlers::play::PlayQuestionData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_play_questions(
    State(state): State<AppState>,
    Query(params): Query<ListPlayQuestionsQuery>,
) -> Result<ApiSuccess<Vec<PlayQuestionData>>, ApiError> {
    state
        .question_service
        .list_questions(params.page.unwrap_or(1), params.size.unwrap_or(0))
        .await
        .map_err(ApiError::from)
        .map(|questions| {
            ApiSuccess::new(
                StatusCode::OK,
                questions.iter().map(PlayQuestionData::from).collect(),
            )
        })
}

/// Pagination parameters; the service clamps out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListPlayQuestionsQuery {
    page: Option<u32>,
    size: Option<u32>,
}
