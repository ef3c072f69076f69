use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::auth::AuthTokensResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn refresh_tokens(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokensRequest>,
) -> Result<ApiSuccess<AuthTokensResponseData>, ApiError> {
    state
        .auth_service
        .refresh_tokens(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|ref tokens| ApiSuccess::new(StatusCode::OK, tokens.into()))
}

/// HTTP request body for rotating a session (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokensRequest {
    refresh_token: String,
}
