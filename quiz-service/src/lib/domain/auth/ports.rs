use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::NotifierError;
use crate::domain::auth::models::AuthTokens;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;

/// Port for the authentication engine.
///
/// Each flow is a short saga over the credential store, the token store,
/// the password hasher, and the token codec. Failures are terminal for the
/// call; the engine never retries.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and open a session.
    ///
    /// # Arguments
    /// * `command` - Validated email and password
    ///
    /// # Returns
    /// Created user and a fresh access+refresh pair
    ///
    /// # Errors
    /// * `Duplicate` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<(User, AuthTokens), AuthError>;

    /// Authenticate with email and password.
    ///
    /// # Arguments
    /// * `email` - Login identifier
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Authenticated user and a fresh access+refresh pair
    ///
    /// # Errors
    /// * `Unauthenticated` - Unknown email or wrong password, surfaced
    ///   identically
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<(User, AuthTokens), AuthError>;

    /// Consume a refresh token, ending its session.
    ///
    /// Not idempotent by contract: a second logout with the same token fails
    /// because the first one consumed the record.
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh token value
    ///
    /// # Errors
    /// * `NotFound` - No active record for this token
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Rotate a refresh token into a fresh session pair.
    ///
    /// The presented token's record is deleted before the new pair is
    /// issued, so a rotated token cannot be replayed.
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh token value
    ///
    /// # Returns
    /// Fresh access+refresh pair
    ///
    /// # Errors
    /// * `Unauthenticated` - Any verification, lookup, or owner failure
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Issue a reset-password token and notify the address out-of-band.
    ///
    /// Succeeds whether or not the email is registered; the response never
    /// reveals account existence. Notification failures are logged, not
    /// propagated.
    ///
    /// # Arguments
    /// * `email` - Address to send the reset link to
    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Consume a reset-password token and set a new password.
    ///
    /// Every outstanding reset token for the same user is invalidated, not
    /// just the one presented.
    ///
    /// # Arguments
    /// * `token` - Reset-password token value
    /// * `new_password` - Policy-checked replacement password
    ///
    /// # Errors
    /// * `Unauthenticated` - Any verification, lookup, or owner failure
    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError>;

    /// Issue a verify-email token for an authenticated user and notify them.
    ///
    /// # Arguments
    /// * `user` - Authenticated user requesting verification
    ///
    /// # Errors
    /// * `DatabaseError` - Token record could not be stored
    async fn send_verification_email(&self, user: &User) -> Result<(), AuthError>;

    /// Consume a verify-email token and mark the owner as verified.
    ///
    /// Verifying an already-verified user succeeds (idempotent, unlike
    /// logout).
    ///
    /// # Arguments
    /// * `token` - Verify-email token value
    ///
    /// # Errors
    /// * `Unauthenticated` - Any verification, lookup, or owner failure
    async fn verify_email(&self, token: &str) -> Result<(), AuthError>;
}

/// Out-of-band notification port.
///
/// Fire-and-forget from the engine's perspective: delivery failure never
/// rolls back token issuance.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Send a password-reset link.
    ///
    /// # Arguments
    /// * `email` - Recipient address
    /// * `token` - Reset-password token to embed in the link
    async fn send_reset_password(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifierError>;

    /// Send an email-verification link.
    ///
    /// # Arguments
    /// * `email` - Recipient address
    /// * `token` - Verify-email token to embed in the link
    async fn send_verify_email(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifierError>;
}
