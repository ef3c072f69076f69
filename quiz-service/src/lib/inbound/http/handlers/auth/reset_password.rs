use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::Password;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<ResetPasswordQuery>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let password = Password::new(body.password)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid password: {e}")))?;

    state
        .auth_service
        .reset_password(&query.token, password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

/// Single-use token carried in the query string of the emailed link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordQuery {
    token: String,
}

/// HTTP request body carrying the replacement password (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    password: String,
}
