use auth::TokenKind;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::UserId;

/// Persisted, revocable token record.
///
/// Access tokens are purely self-verifying and never stored; every other
/// kind (refresh, reset-password, verify-email) gets a record here so it can
/// be consumed or revoked individually. Single-use kinds are deleted on
/// successful use, refresh records on logout or rotation.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub token: String,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Build a new record for a freshly issued token.
    ///
    /// # Arguments
    /// * `user_id` - Owning user
    /// * `token` - Signed token value
    /// * `kind` - Credential kind the token was issued for
    /// * `expires_at` - Expiry embedded in the signed token
    ///
    /// # Returns
    /// Unsaved TokenRecord
    pub fn new(user_id: UserId, token: String, kind: TokenKind, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            kind,
            expires_at,
            revoked: false,
            created_at: Utc::now(),
        }
    }
}
