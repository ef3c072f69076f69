use async_trait::async_trait;
use auth::TokenKind;
use uuid::Uuid;

use crate::domain::token::errors::TokenStoreError;
use crate::domain::token::models::TokenRecord;
use crate::domain::user::models::UserId;

/// Persistence operations for issued token records.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    /// Persist a freshly issued token record.
    ///
    /// # Arguments
    /// * `record` - Record to store
    ///
    /// # Returns
    /// Stored record
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, record: TokenRecord) -> Result<TokenRecord, TokenStoreError>;

    /// Look up a non-revoked record by token value and kind.
    ///
    /// A token of one kind never matches a lookup for another, so a refresh
    /// token cannot be consumed by the reset-password flow.
    ///
    /// # Arguments
    /// * `token` - Signed token value
    /// * `kind` - Expected credential kind
    ///
    /// # Returns
    /// Optional record (None if absent or revoked)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_active(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<Option<TokenRecord>, TokenStoreError>;

    /// Remove a single record by identifier.
    ///
    /// # Arguments
    /// * `id` - Record identifier
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - Record was already removed
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: Uuid) -> Result<(), TokenStoreError>;

    /// Remove every record of a kind owned by a user.
    ///
    /// Used to invalidate sibling reset/verify tokens once one of them has
    /// been consumed.
    ///
    /// # Arguments
    /// * `user_id` - Owning user
    /// * `kind` - Credential kind to purge
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_user_and_kind(
        &self,
        user_id: &UserId,
        kind: TokenKind,
    ) -> Result<u64, TokenStoreError>;
}
