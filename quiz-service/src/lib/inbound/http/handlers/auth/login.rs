use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::auth::models::AuthTokens;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::auth::AuthTokensResponseData;
use crate::inbound::http::handlers::users::UserResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

const INCORRECT_EMAIL_OR_PASSWORD: &str = "Incorrect email or password";

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed email is indistinguishable from an unknown one.
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized(INCORRECT_EMAIL_OR_PASSWORD.to_string()))?;

    state
        .auth_service
        .login(&email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|(ref user, ref tokens)| ApiSuccess::new(StatusCode::OK, (user, tokens).into()))
}

/// HTTP request body for logging in (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserResponseData,
    pub tokens: AuthTokensResponseData,
}

impl From<(&User, &AuthTokens)> for LoginResponseData {
    fn from((user, tokens): (&User, &AuthTokens)) -> Self {
        Self {
            user: user.into(),
            tokens: tokens.into(),
        }
    }
}
