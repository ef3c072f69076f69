use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const PLEASE_AUTHENTICATE: &str = "Please authenticate";

/// Extension type carrying the authenticated user through the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Middleware that validates access tokens and loads the calling user.
///
/// Only `Access`-kind tokens pass; a refresh or single-use token presented
/// as a bearer credential is rejected before any handler runs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .token_codec
        .verify(token, TokenKind::Access)
        .map_err(|e| {
            tracing::debug!(error = %e, "access token rejected");
            unauthorized()
        })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::debug!(error = %e, "access token subject is not a user id");
        unauthorized()
    })?;

    let user = state.user_service.get_user(&user_id).await.map_err(|e| {
        tracing::debug!(error = %e, "access token owner lookup failed");
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

/// Middleware restricting a route to admin users.
///
/// Must run after `authenticate`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let authenticated = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(unauthorized)?;

    if authenticated.user.role != Role::Admin {
        return Err(ApiError::Forbidden("Forbidden".to_string()).into_response());
    }

    Ok(next.run(req).await)
}

fn unauthorized() -> Response {
    ApiError::Unauthorized(PLEASE_AUTHENTICATE.to_string()).into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| unauthorized())?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)
}
