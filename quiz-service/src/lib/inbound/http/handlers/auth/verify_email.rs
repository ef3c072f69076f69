use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .verify_email(&query.token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

/// Single-use token carried in the query string of the emailed link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyEmailQuery {
    token: String,
}
