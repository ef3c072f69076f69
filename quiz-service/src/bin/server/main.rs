use std::sync::Arc;

use auth::TokenCodec;
use quiz_service::config::Config;
use quiz_service::domain::auth::models::TokenTtls;
use quiz_service::domain::auth::service::AuthService;
use quiz_service::domain::question::service::QuestionService;
use quiz_service::domain::user::service::UserService;
use quiz_service::inbound::http::router::create_router;
use quiz_service::outbound::notifier::SmtpNotifier;
use quiz_service::outbound::repositories::PostgresQuestionRepository;
use quiz_service::outbound::repositories::PostgresTokenRepository;
use quiz_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "quiz-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        smtp_host = %config.email.smtp_host,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_codec = Arc::new(TokenCodec::new(config.jwt.secret.as_bytes()));
    let token_ttls = TokenTtls::new(
        config.jwt.access_ttl_minutes,
        config.jwt.refresh_ttl_days,
        config.jwt.reset_password_ttl_minutes,
        config.jwt.verify_email_ttl_hours,
    );

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let token_repository = Arc::new(PostgresTokenRepository::new(pg_pool.clone()));
    let question_repository = Arc::new(PostgresQuestionRepository::new(pg_pool));
    let notifier = Arc::new(SmtpNotifier::new(&config.email)?);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        token_repository,
        notifier,
        Arc::clone(&token_codec),
        token_ttls,
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
    let question_service = Arc::new(QuestionService::new(question_repository, user_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, user_service, question_service, token_codec);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
