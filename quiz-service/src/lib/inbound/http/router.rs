use std::sync::Arc;
use std::time::Duration;

use auth::TokenCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::forgot_password::forgot_password;
use super::handlers::auth::login::login;
use super::handlers::auth::logout::logout;
use super::handlers::auth::refresh_tokens::refresh_tokens;
use super::handlers::auth::register::register;
use super::handlers::auth::reset_password::reset_password;
use super::handlers::auth::send_verification_email::send_verification_email;
use super::handlers::auth::verify_email::verify_email;
use super::handlers::play::list_play_questions::list_play_questions;
use super::handlers::play::submit_answers::submit_answers;
use super::handlers::questions::create_question::create_question;
use super::handlers::questions::delete_question::delete_question;
use super::handlers::questions::get_question::get_question;
use super::handlers::questions::list_questions::list_questions;
use super::handlers::questions::update_question::update_question;
use super::handlers::users::create_user::create_user;
use super::handlers::users::delete_user::delete_user;
use super::handlers::users::get_user::get_user;
use super::handlers::users::list_users::list_users;
use super::handlers::users::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::auth::service::AuthService;
use crate::domain::question::service::QuestionService;
use crate::domain::user::service::UserService;
use crate::outbound::notifier::SmtpNotifier;
use crate::outbound::repositories::PostgresQuestionRepository;
use crate::outbound::repositories::PostgresTokenRepository;
use crate::outbound::repositories::PostgresUserRepository;

pub type AppAuthService =
    AuthService<PostgresUserRepository, PostgresTokenRepository, SmtpNotifier>;
pub type AppUserService = UserService<PostgresUserRepository>;
pub type AppQuestionService = QuestionService<PostgresQuestionRepository, PostgresUserRepository>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AppAuthService>,
    pub user_service: Arc<AppUserService>,
    pub question_service: Arc<AppQuestionService>,
    pub token_codec: Arc<TokenCodec>,
}

pub fn create_router(
    auth_service: Arc<AppAuthService>,
    user_service: Arc<AppUserService>,
    question_service: Arc<AppQuestionService>,
    token_codec: Arc<TokenCodec>,
) -> Router {
    let state = AppState {
        auth_service,
        user_service,
        question_service,
        token_codec,
    };

    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/refresh-tokens", post(refresh_tokens))
        .route("/api/v1/auth/forgot-password", post(forgot_password))
        .route("/api/v1/auth/reset-password", post(reset_password))
        .route("/api/v1/auth/verify-email", post(verify_email));

    let protected_routes = Router::new()
        .route(
            "/api/v1/auth/send-verification-email",
            post(send_verification_email),
        )
        .route("/api/v1/play", get(list_play_questions))
        .route("/api/v1/play/submit", post(submit_answers))
        .route("/api/v1/questions", get(list_questions))
        .route("/api/v1/questions/:question_id", get(get_question))
        .route("/api/v1/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/:user_id", patch(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        .route("/api/v1/questions", post(create_question))
        .route("/api/v1/questions/:question_id", patch(update_question))
        .route("/api/v1/questions/:question_id", delete(delete_question))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
