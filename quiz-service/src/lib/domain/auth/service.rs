use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenClaims;
use auth::TokenCodec;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthTokens;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::TokenData;
use crate::domain::auth::models::TokenTtls;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::Notifier;
use crate::domain::token::models::TokenRecord;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

const INCORRECT_EMAIL_OR_PASSWORD: &str = "Incorrect email or password";
const PLEASE_AUTHENTICATE: &str = "Please authenticate";
const PASSWORD_RESET_FAILED: &str = "Password reset failed";
const EMAIL_VERIFICATION_FAILED: &str = "Email verification failed";

/// Authentication engine.
///
/// Orchestrates login, logout, refresh-rotation, password-reset, and
/// email-verification over injected store ports, the password hasher, and
/// the token codec. The consume-and-act flows fold every internal failure
/// (expired, malformed, record missing, owner missing) into a single
/// `Unauthenticated` error so callers cannot enumerate accounts or probe
/// token state.
pub struct AuthService<UR, TR, N>
where
    UR: UserRepository,
    TR: TokenRepository,
    N: Notifier,
{
    users: Arc<UR>,
    tokens: Arc<TR>,
    notifier: Arc<N>,
    codec: Arc<TokenCodec>,
    ttls: TokenTtls,
    password_hasher: auth::PasswordHasher,
}

fn unauthenticated(message: &str) -> AuthError {
    AuthError::Unauthenticated(message.to_string())
}

fn expiry_of(claims: &TokenClaims) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AuthError::Unknown("token expiry out of range".to_string()))
}

impl<UR, TR, N> AuthService<UR, TR, N>
where
    UR: UserRepository,
    TR: TokenRepository,
    N: Notifier,
{
    /// Create a new authentication engine with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Credential store implementation
    /// * `tokens` - Token store implementation
    /// * `notifier` - Out-of-band notification implementation
    /// * `codec` - Shared token codec
    /// * `ttls` - Per-kind validity windows
    pub fn new(
        users: Arc<UR>,
        tokens: Arc<TR>,
        notifier: Arc<N>,
        codec: Arc<TokenCodec>,
        ttls: TokenTtls,
    ) -> Self {
        Self {
            users,
            tokens,
            notifier,
            codec,
            ttls,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Issue an access+refresh pair and persist the refresh record.
    async fn issue_auth_tokens(&self, user_id: &UserId) -> Result<AuthTokens, AuthError> {
        let subject = user_id.to_string();

        let (access_token, access_claims) = self
            .codec
            .issue(&subject, TokenKind::Access, self.ttls.access)
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))?;

        let (refresh_token, refresh_claims) = self
            .codec
            .issue(&subject, TokenKind::Refresh, self.ttls.refresh)
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))?;

        let refresh_expires_at = expiry_of(&refresh_claims)?;
        self.tokens
            .create(TokenRecord::new(
                *user_id,
                refresh_token.clone(),
                TokenKind::Refresh,
                refresh_expires_at,
            ))
            .await?;

        Ok(AuthTokens {
            access: TokenData {
                token: access_token,
                expires_at: expiry_of(&access_claims)?,
            },
            refresh: TokenData {
                token: refresh_token,
                expires_at: refresh_expires_at,
            },
        })
    }

    /// Issue and persist a single-use token bound to a user.
    async fn issue_single_use(
        &self,
        user_id: &UserId,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, AuthError> {
        let (token, claims) = self
            .codec
            .issue(&user_id.to_string(), kind, ttl)
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))?;

        self.tokens
            .create(TokenRecord::new(
                *user_id,
                token.clone(),
                kind,
                expiry_of(&claims)?,
            ))
            .await?;

        Ok(token)
    }
}

#[async_trait]
impl<UR, TR, N> AuthServicePort for AuthService<UR, TR, N>
where
    UR: UserRepository,
    TR: TokenRepository,
    N: Notifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<(User, AuthTokens), AuthError> {
        let password_hash = self
            .password_hasher
            .hash(command.password.as_str())
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            role: Role::User,
            email_verified: false,
            score: 0,
            created_at: Utc::now(),
        };

        let user = self.users.create(user).await?;
        let tokens = self.issue_auth_tokens(&user.id).await?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok((user, tokens))
    }

    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError> {
        // Unknown email and wrong password surface identically.
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| unauthenticated(INCORRECT_EMAIL_OR_PASSWORD))?;

        let matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|e| AuthError::Unknown(format!("Password verification failed: {}", e)))?;
        if !matches {
            return Err(unauthenticated(INCORRECT_EMAIL_OR_PASSWORD));
        }

        let tokens = self.issue_auth_tokens(&user.id).await?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok((user, tokens))
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let record = self
            .tokens
            .find_active(refresh_token, TokenKind::Refresh)
            .await?
            .ok_or_else(|| AuthError::NotFound("Not found".to_string()))?;

        self.tokens.delete(record.id).await?;

        tracing::info!(user_id = %record.user_id, "user logged out");

        Ok(())
    }

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        // Ordering is mandatory: codec verification, then the store lookup,
        // then rotation. A token whose record is gone must be rejected even
        // while its signature is still within the expiry window.
        let claims = self
            .codec
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::debug!(error = %e, "refresh token rejected by codec");
                unauthenticated(PLEASE_AUTHENTICATE)
            })?;

        let record = self
            .tokens
            .find_active(refresh_token, TokenKind::Refresh)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "refresh token store lookup failed");
                unauthenticated(PLEASE_AUTHENTICATE)
            })?
            .ok_or_else(|| unauthenticated(PLEASE_AUTHENTICATE))?;

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|_| unauthenticated(PLEASE_AUTHENTICATE))?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "refresh token owner lookup failed");
                unauthenticated(PLEASE_AUTHENTICATE)
            })?
            .ok_or_else(|| unauthenticated(PLEASE_AUTHENTICATE))?;

        // Rotation. Under a concurrent refresh with the same token the first
        // delete wins and the loser fails here.
        self.tokens.delete(record.id).await.map_err(|e| {
            tracing::debug!(error = %e, "refresh token already rotated");
            unauthenticated(PLEASE_AUTHENTICATE)
        })?;

        self.issue_auth_tokens(&user.id)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "refresh token reissue failed");
                unauthenticated(PLEASE_AUTHENTICATE)
            })
    }

    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError> {
        // Unknown addresses get the same signed token and notification;
        // only the store write is skipped. The caller sees one shape.
        let token = match self.users.find_by_email(email).await? {
            Some(user) => {
                self.issue_single_use(
                    &user.id,
                    TokenKind::ResetPassword,
                    self.ttls.reset_password,
                )
                .await?
            }
            None => {
                let (token, _) = self
                    .codec
                    .issue(
                        &UserId::new().to_string(),
                        TokenKind::ResetPassword,
                        self.ttls.reset_password,
                    )
                    .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))?;
                token
            }
        };

        if let Err(e) = self.notifier.send_reset_password(email, &token).await {
            tracing::warn!(error = %e, "failed to send reset password email");
        }

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError> {
        let claims = self
            .codec
            .verify(token, TokenKind::ResetPassword)
            .map_err(|e| {
                tracing::debug!(error = %e, "reset token rejected by codec");
                unauthenticated(PASSWORD_RESET_FAILED)
            })?;

        let active = self
            .tokens
            .find_active(token, TokenKind::ResetPassword)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "reset token store lookup failed");
                unauthenticated(PASSWORD_RESET_FAILED)
            })?;
        if active.is_none() {
            return Err(unauthenticated(PASSWORD_RESET_FAILED));
        }

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|_| unauthenticated(PASSWORD_RESET_FAILED))?;
        let mut user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "reset token owner lookup failed");
                unauthenticated(PASSWORD_RESET_FAILED)
            })?
            .ok_or_else(|| unauthenticated(PASSWORD_RESET_FAILED))?;

        user.password_hash = self
            .password_hasher
            .hash(new_password.as_str())
            .map_err(|e| {
                tracing::debug!(error = %e, "reset password hashing failed");
                unauthenticated(PASSWORD_RESET_FAILED)
            })?;
        self.users.update(user).await.map_err(|e| {
            tracing::debug!(error = %e, "reset password update failed");
            unauthenticated(PASSWORD_RESET_FAILED)
        })?;

        // A successful reset invalidates every outstanding reset token for
        // this user, not just the one presented.
        self.tokens
            .delete_by_user_and_kind(&user_id, TokenKind::ResetPassword)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "reset token purge failed");
                unauthenticated(PASSWORD_RESET_FAILED)
            })?;

        tracing::info!(user_id = %user_id, "password reset");

        Ok(())
    }

    async fn send_verification_email(&self, user: &User) -> Result<(), AuthError> {
        let token = self
            .issue_single_use(&user.id, TokenKind::VerifyEmail, self.ttls.verify_email)
            .await?;

        if let Err(e) = self.notifier.send_verify_email(&user.email, &token).await {
            tracing::warn!(error = %e, "failed to send verification email");
        }

        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let claims = self
            .codec
            .verify(token, TokenKind::VerifyEmail)
            .map_err(|e| {
                tracing::debug!(error = %e, "verify token rejected by codec");
                unauthenticated(EMAIL_VERIFICATION_FAILED)
            })?;

        let active = self
            .tokens
            .find_active(token, TokenKind::VerifyEmail)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "verify token store lookup failed");
                unauthenticated(EMAIL_VERIFICATION_FAILED)
            })?;
        if active.is_none() {
            return Err(unauthenticated(EMAIL_VERIFICATION_FAILED));
        }

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|_| unauthenticated(EMAIL_VERIFICATION_FAILED))?;
        let mut user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "verify token owner lookup failed");
                unauthenticated(EMAIL_VERIFICATION_FAILED)
            })?
            .ok_or_else(|| unauthenticated(EMAIL_VERIFICATION_FAILED))?;

        self.tokens
            .delete_by_user_and_kind(&user_id, TokenKind::VerifyEmail)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "verify token purge failed");
                unauthenticated(EMAIL_VERIFICATION_FAILED)
            })?;

        // Idempotent for already-verified users.
        user.email_verified = true;
        self.users.update(user).await.map_err(|e| {
            tracing::debug!(error = %e, "verified flag update failed");
            unauthenticated(EMAIL_VERIFICATION_FAILED)
        })?;

        tracing::info!(user_id = %user_id, "email verified");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use auth::TokenError;
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::*;
    use uuid::Uuid;

    use super::*;
    use crate::domain::auth::errors::NotifierError;
    use crate::domain::token::errors::TokenStoreError;
    use crate::domain::user::errors::UserError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list(&self, page: u32, size: u32) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn add_score(&self, id: &UserId, points: i32) -> Result<i32, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestTokenRepository {}

        #[async_trait]
        impl TokenRepository for TestTokenRepository {
            async fn create(&self, record: TokenRecord) -> Result<TokenRecord, TokenStoreError>;
            async fn find_active(&self, token: &str, kind: TokenKind) -> Result<Option<TokenRecord>, TokenStoreError>;
            async fn delete(&self, id: Uuid) -> Result<(), TokenStoreError>;
            async fn delete_by_user_and_kind(&self, user_id: &UserId, kind: TokenKind) -> Result<u64, TokenStoreError>;
        }
    }

    mock! {
        pub TestNotifier {}

        #[async_trait]
        impl Notifier for TestNotifier {
            async fn send_reset_password(&self, email: &EmailAddress, token: &str) -> Result<(), NotifierError>;
            async fn send_verify_email(&self, email: &EmailAddress, token: &str) -> Result<(), NotifierError>;
        }
    }

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(b"test_secret_key_at_least_32_bytes!"))
    }

    fn ttls() -> TokenTtls {
        TokenTtls::new(30, 30, 10, 24)
    }

    fn service(
        users: MockTestUserRepository,
        tokens: MockTestTokenRepository,
        notifier: MockTestNotifier,
        codec: Arc<TokenCodec>,
    ) -> AuthService<MockTestUserRepository, MockTestTokenRepository, MockTestNotifier> {
        AuthService::new(
            Arc::new(users),
            Arc::new(tokens),
            Arc::new(notifier),
            codec,
            ttls(),
        )
    }

    fn stored_user(id: UserId, email: &str, password: &str) -> User {
        let hasher = auth::PasswordHasher::new();
        User {
            id,
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hasher.hash(password).unwrap(),
            role: Role::User,
            email_verified: false,
            score: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_session_pair() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let notifier = MockTestNotifier::new();
        let codec = codec();

        users
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "nicola@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.role == Role::User
                    && !user.email_verified
                    && user.score == 0
            })
            .times(1)
            .returning(|user| Ok(user));

        tokens
            .expect_create()
            .withf(|record| record.kind == TokenKind::Refresh && !record.revoked)
            .times(1)
            .returning(|record| Ok(record));

        let service = service(users, tokens, notifier, Arc::clone(&codec));

        let command = RegisterCommand::new(
            EmailAddress::new("nicola@example.com".to_string()).unwrap(),
            Password::new("pass_word1".to_string()).unwrap(),
        );

        let (user, session) = service.register(command).await.unwrap();

        let access_claims = codec.verify(&session.access.token, TokenKind::Access).unwrap();
        assert_eq!(access_claims.sub, user.id.to_string());
        let refresh_claims = codec
            .verify(&session.refresh.token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh_claims.sub, user.id.to_string());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let notifier = MockTestNotifier::new();

        users.expect_create().times(1).returning(|user| {
            Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ))
        });
        tokens.expect_create().times(0);

        let service = service(users, tokens, notifier, codec());

        let command = RegisterCommand::new(
            EmailAddress::new("nicola@example.com".to_string()).unwrap(),
            Password::new("pass_word1".to_string()).unwrap(),
        );

        let result = service.register(command).await;
        assert!(matches!(result.unwrap_err(), AuthError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let notifier = MockTestNotifier::new();
        let codec = codec();

        let user_id = UserId::new();
        let user = stored_user(user_id, "nicola@example.com", "pass_word1");

        let returned = user.clone();
        users
            .expect_find_by_email()
            .withf(|email| email.as_str() == "nicola@example.com")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        tokens
            .expect_create()
            .withf(move |record| record.user_id == user_id && record.kind == TokenKind::Refresh)
            .times(1)
            .returning(|record| Ok(record));

        let service = service(users, tokens, notifier, Arc::clone(&codec));

        let email = EmailAddress::new("nicola@example.com".to_string()).unwrap();
        let (logged_in, session) = service.login(&email, "pass_word1").await.unwrap();

        assert_eq!(logged_in.id, user_id);
        let claims = codec.verify(&session.access.token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[tokio::test]
    async fn test_login_failure_does_not_reveal_which_field_was_wrong() {
        let user = stored_user(UserId::new(), "nicola@example.com", "pass_word1");

        // Wrong password for an existing account.
        let mut users = MockTestUserRepository::new();
        let returned = user.clone();
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        let service_known = service(
            users,
            MockTestTokenRepository::new(),
            MockTestNotifier::new(),
            codec(),
        );

        let email = EmailAddress::new("nicola@example.com".to_string()).unwrap();
        let wrong_password = service_known
            .login(&email, "wrong_pass1")
            .await
            .unwrap_err();

        // Unknown account.
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        let service_unknown = service(
            users,
            MockTestTokenRepository::new(),
            MockTestNotifier::new(),
            codec(),
        );

        let unknown_email = service_unknown
            .login(&email, "pass_word1")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::Unauthenticated(_)));
        assert!(matches!(unknown_email, AuthError::Unauthenticated(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_logout_consumes_the_record() {
        let mut tokens = MockTestTokenRepository::new();

        let user_id = UserId::new();
        let record = TokenRecord::new(
            user_id,
            "refresh-token".to_string(),
            TokenKind::Refresh,
            Utc::now() + Duration::days(30),
        );
        let record_id = record.id;

        let returned = record.clone();
        tokens
            .expect_find_active()
            .withf(|token, kind| token == "refresh-token" && *kind == TokenKind::Refresh)
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        tokens
            .expect_delete()
            .with(eq(record_id))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            MockTestNotifier::new(),
            codec(),
        );

        assert!(service.logout("refresh-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_second_logout_fails_not_found() {
        let mut tokens = MockTestTokenRepository::new();

        tokens
            .expect_find_active()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            MockTestNotifier::new(),
            codec(),
        );

        let result = service.logout("already-consumed").await;
        assert!(matches!(result.unwrap_err(), AuthError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_the_record() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let codec = codec();

        let user_id = UserId::new();
        let user = stored_user(user_id, "nicola@example.com", "pass_word1");

        // Issued with a shorter window than the service uses so the rotated
        // token is observably different.
        let (old_refresh, old_claims) = codec
            .issue(&user_id.to_string(), TokenKind::Refresh, Duration::days(20))
            .unwrap();
        let record = TokenRecord::new(
            user_id,
            old_refresh.clone(),
            TokenKind::Refresh,
            expiry_of(&old_claims).unwrap(),
        );
        let record_id = record.id;

        let returned = record.clone();
        let expected_token = old_refresh.clone();
        tokens
            .expect_find_active()
            .withf(move |token, kind| token == expected_token && *kind == TokenKind::Refresh)
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        tokens
            .expect_delete()
            .with(eq(record_id))
            .times(1)
            .returning(|_| Ok(()));
        tokens
            .expect_create()
            .withf(move |r| r.user_id == user_id && r.kind == TokenKind::Refresh)
            .times(1)
            .returning(|r| Ok(r));

        let returned_user = user.clone();
        users
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let service = service(users, tokens, MockTestNotifier::new(), Arc::clone(&codec));

        let session = service.refresh_tokens(&old_refresh).await.unwrap();
        assert_ne!(session.refresh.token, old_refresh);
        assert!(codec
            .verify(&session.refresh.token, TokenKind::Refresh)
            .is_ok());
    }

    #[tokio::test]
    async fn test_refresh_replay_after_rotation() {
        let mut tokens = MockTestTokenRepository::new();
        let codec = codec();

        let user_id = UserId::new();
        let (old_refresh, _) = codec
            .issue(&user_id.to_string(), TokenKind::Refresh, Duration::days(30))
            .unwrap();

        // Record is gone after rotation; signature is still valid.
        tokens
            .expect_find_active()
            .times(1)
            .returning(|_, _| Ok(None));
        tokens.expect_delete().times(0);

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            MockTestNotifier::new(),
            Arc::clone(&codec),
        );

        let err = service.refresh_tokens(&old_refresh).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
        assert_eq!(err.to_string(), PLEASE_AUTHENTICATE);
    }

    #[tokio::test]
    async fn test_refresh_garbage_token_never_consults_the_store() {
        let mut tokens = MockTestTokenRepository::new();
        tokens.expect_find_active().times(0);

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            MockTestNotifier::new(),
            codec(),
        );

        let err = service.refresh_tokens("invalid.token.here").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_refresh_wrong_kind_is_rejected() {
        let codec = codec();
        let user_id = UserId::new();
        let (access_token, _) = codec
            .issue(&user_id.to_string(), TokenKind::Access, Duration::minutes(30))
            .unwrap();

        let mut tokens = MockTestTokenRepository::new();
        tokens.expect_find_active().times(0);

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            MockTestNotifier::new(),
            Arc::clone(&codec),
        );

        let err = service.refresh_tokens(&access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_refresh_fails_when_owner_is_gone() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let codec = codec();

        let user_id = UserId::new();
        let (refresh, claims) = codec
            .issue(&user_id.to_string(), TokenKind::Refresh, Duration::days(30))
            .unwrap();
        let record = TokenRecord::new(
            user_id,
            refresh.clone(),
            TokenKind::Refresh,
            expiry_of(&claims).unwrap(),
        );

        let returned = record.clone();
        tokens
            .expect_find_active()
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        tokens.expect_delete().times(0);

        users
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(users, tokens, MockTestNotifier::new(), Arc::clone(&codec));

        let err = service.refresh_tokens(&refresh).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_forgot_password_known_email_persists_and_notifies() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let mut notifier = MockTestNotifier::new();

        let user_id = UserId::new();
        let user = stored_user(user_id, "nicola@example.com", "pass_word1");

        let returned = user.clone();
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        tokens
            .expect_create()
            .withf(move |record| {
                record.user_id == user_id && record.kind == TokenKind::ResetPassword
            })
            .times(1)
            .returning(|record| Ok(record));

        notifier
            .expect_send_reset_password()
            .withf(|email, token| email.as_str() == "nicola@example.com" && !token.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(users, tokens, notifier, codec());

        let email = EmailAddress::new("nicola@example.com".to_string()).unwrap();
        assert!(service.forgot_password(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_still_succeeds() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let mut notifier = MockTestNotifier::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        // No record to persist, but the notification still goes out.
        tokens.expect_create().times(0);
        notifier
            .expect_send_reset_password()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(users, tokens, notifier, codec());

        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        assert!(service.forgot_password(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_forgot_password_swallows_notifier_failure() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let mut notifier = MockTestNotifier::new();

        let user = stored_user(UserId::new(), "nicola@example.com", "pass_word1");
        let returned = user.clone();
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        tokens
            .expect_create()
            .times(1)
            .returning(|record| Ok(record));
        notifier
            .expect_send_reset_password()
            .times(1)
            .returning(|_, _| Err(NotifierError::SendFailed("smtp down".to_string())));

        let service = service(users, tokens, notifier, codec());

        let email = EmailAddress::new("nicola@example.com".to_string()).unwrap();
        assert!(service.forgot_password(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_updates_hash_and_purges_siblings() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let codec = codec();

        let user_id = UserId::new();
        let user = stored_user(user_id, "nicola@example.com", "old_pass1");

        let (reset_token, claims) = codec
            .issue(
                &user_id.to_string(),
                TokenKind::ResetPassword,
                Duration::minutes(10),
            )
            .unwrap();
        let record = TokenRecord::new(
            user_id,
            reset_token.clone(),
            TokenKind::ResetPassword,
            expiry_of(&claims).unwrap(),
        );

        let returned = record.clone();
        let expected_token = reset_token.clone();
        tokens
            .expect_find_active()
            .withf(move |token, kind| token == expected_token && *kind == TokenKind::ResetPassword)
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        tokens
            .expect_delete_by_user_and_kind()
            .withf(move |id, kind| *id == user_id && *kind == TokenKind::ResetPassword)
            .times(1)
            .returning(|_, _| Ok(3));

        let returned_user = user.clone();
        users
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        users
            .expect_update()
            .withf(|updated| {
                let hasher = auth::PasswordHasher::new();
                hasher.verify("new_pass1", &updated.password_hash).unwrap()
            })
            .times(1)
            .returning(|updated| Ok(updated));

        let service = service(users, tokens, MockTestNotifier::new(), Arc::clone(&codec));

        let new_password = Password::new("new_pass1".to_string()).unwrap();
        assert!(service.reset_password(&reset_token, new_password).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_folds_failures() {
        let codec = codec();

        // Consumed token: valid signature, no record.
        let user_id = UserId::new();
        let (reset_token, _) = codec
            .issue(
                &user_id.to_string(),
                TokenKind::ResetPassword,
                Duration::minutes(10),
            )
            .unwrap();

        let mut tokens = MockTestTokenRepository::new();
        tokens
            .expect_find_active()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            MockTestNotifier::new(),
            Arc::clone(&codec),
        );

        let consumed = service
            .reset_password(
                &reset_token,
                Password::new("new_pass1".to_string()).unwrap(),
            )
            .await
            .unwrap_err();

        // Malformed token.
        let service = service_with_unused_mocks(Arc::clone(&codec));
        let malformed = service
            .reset_password("garbage", Password::new("new_pass1".to_string()).unwrap())
            .await
            .unwrap_err();

        assert_eq!(consumed.to_string(), PASSWORD_RESET_FAILED);
        assert_eq!(malformed.to_string(), PASSWORD_RESET_FAILED);
    }

    fn service_with_unused_mocks(
        codec: Arc<TokenCodec>,
    ) -> AuthService<MockTestUserRepository, MockTestTokenRepository, MockTestNotifier> {
        service(
            MockTestUserRepository::new(),
            MockTestTokenRepository::new(),
            MockTestNotifier::new(),
            codec,
        )
    }

    #[tokio::test]
    async fn test_send_verification_email_persists_and_notifies() {
        let mut tokens = MockTestTokenRepository::new();
        let mut notifier = MockTestNotifier::new();

        let user = stored_user(UserId::new(), "nicola@example.com", "pass_word1");
        let user_id = user.id;

        tokens
            .expect_create()
            .withf(move |record| {
                record.user_id == user_id && record.kind == TokenKind::VerifyEmail
            })
            .times(1)
            .returning(|record| Ok(record));
        notifier
            .expect_send_verify_email()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(
            MockTestUserRepository::new(),
            tokens,
            notifier,
            codec(),
        );

        assert!(service.send_verification_email(&user).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_email_sets_flag_and_purges_tokens() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let codec = codec();

        let user_id = UserId::new();
        let user = stored_user(user_id, "nicola@example.com", "pass_word1");

        let (verify_token, claims) = codec
            .issue(
                &user_id.to_string(),
                TokenKind::VerifyEmail,
                Duration::hours(24),
            )
            .unwrap();
        let record = TokenRecord::new(
            user_id,
            verify_token.clone(),
            TokenKind::VerifyEmail,
            expiry_of(&claims).unwrap(),
        );

        let returned = record.clone();
        tokens
            .expect_find_active()
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        tokens
            .expect_delete_by_user_and_kind()
            .withf(move |id, kind| *id == user_id && *kind == TokenKind::VerifyEmail)
            .times(1)
            .returning(|_, _| Ok(1));

        let returned_user = user.clone();
        users
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        users
            .expect_update()
            .withf(|updated| updated.email_verified)
            .times(1)
            .returning(|updated| Ok(updated));

        let service = service(users, tokens, MockTestNotifier::new(), Arc::clone(&codec));

        assert!(service.verify_email(&verify_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_email_is_idempotent_for_verified_users() {
        let mut users = MockTestUserRepository::new();
        let mut tokens = MockTestTokenRepository::new();
        let codec = codec();

        let user_id = UserId::new();
        let mut user = stored_user(user_id, "nicola@example.com", "pass_word1");
        user.email_verified = true;

        let (verify_token, claims) = codec
            .issue(
                &user_id.to_string(),
                TokenKind::VerifyEmail,
                Duration::hours(24),
            )
            .unwrap();
        let record = TokenRecord::new(
            user_id,
            verify_token.clone(),
            TokenKind::VerifyEmail,
            expiry_of(&claims).unwrap(),
        );

        let returned = record.clone();
        tokens
            .expect_find_active()
            .times(1)
            .returning(move |_, _| Ok(Some(returned.clone())));
        tokens
            .expect_delete_by_user_and_kind()
            .times(1)
            .returning(|_, _| Ok(1));

        let returned_user = user.clone();
        users
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        users
            .expect_update()
            .withf(|updated| updated.email_verified)
            .times(1)
            .returning(|updated| Ok(updated));

        let service = service(users, tokens, MockTestNotifier::new(), Arc::clone(&codec));

        assert!(service.verify_email(&verify_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_email_rejects_expired_token() {
        let codec = codec();
        let user_id = UserId::new();

        let (expired, _) = codec
            .issue(
                &user_id.to_string(),
                TokenKind::VerifyEmail,
                Duration::minutes(-10),
            )
            .unwrap();
        assert_eq!(
            codec.verify(&expired, TokenKind::VerifyEmail),
            Err(TokenError::Expired)
        );

        let service = service_with_unused_mocks(Arc::clone(&codec));

        let err = service.verify_email(&expired).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
        assert_eq!(err.to_string(), EMAIL_VERIFICATION_FAILED);
    }
}
