use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;

/// A single issued token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Session pair returned by login, register, and refresh.
///
/// The access token is stateless; only the refresh token has a backing
/// record in the token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access: TokenData,
    pub refresh: TokenData,
}

/// Validity windows per token kind, loaded from configuration.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtls {
    pub access: Duration,
    pub refresh: Duration,
    pub reset_password: Duration,
    pub verify_email: Duration,
}

impl TokenTtls {
    /// Build TTLs from the units the configuration exposes.
    ///
    /// # Arguments
    /// * `access_minutes` - Access token validity in minutes
    /// * `refresh_days` - Refresh token validity in days
    /// * `reset_password_minutes` - Reset token validity in minutes
    /// * `verify_email_hours` - Verify token validity in hours
    pub fn new(
        access_minutes: i64,
        refresh_days: i64,
        reset_password_minutes: i64,
        verify_email_hours: i64,
    ) -> Self {
        Self {
            access: Duration::minutes(access_minutes),
            refresh: Duration::days(refresh_days),
            reset_password: Duration::minutes(reset_password_minutes),
            verify_email: Duration::hours(verify_email_hours),
        }
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Policy-checked plaintext password (hashed by the engine)
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}
