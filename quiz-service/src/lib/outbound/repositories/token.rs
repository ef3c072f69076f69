use async_trait::async_trait;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::token::errors::TokenStoreError;
use crate::domain::token::models::TokenRecord;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::UserId;

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: Uuid,
    user_id: Uuid,
    token: String,
    kind: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
    created_at: DateTime<Utc>,
}

impl TokenRow {
    fn into_record(self) -> Result<TokenRecord, TokenStoreError> {
        let kind = kind_from_str(&self.kind)?;
        Ok(TokenRecord {
            id: self.id,
            user_id: UserId(self.user_id),
            token: self.token,
            kind,
            expires_at: self.expires_at,
            revoked: self.revoked,
            created_at: self.created_at,
        })
    }
}

fn kind_from_str(kind: &str) -> Result<TokenKind, TokenStoreError> {
    match kind {
        "access" => Ok(TokenKind::Access),
        "refresh" => Ok(TokenKind::Refresh),
        "resetPassword" => Ok(TokenKind::ResetPassword),
        "verifyEmail" => Ok(TokenKind::VerifyEmail),
        other => Err(TokenStoreError::DatabaseError(format!(
            "unknown token kind in storage: {}",
            other
        ))),
    }
}

pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn create(&self, record: TokenRecord) -> Result<TokenRecord, TokenStoreError> {
        sqlx::query(
            r#"
            INSERT INTO tokens (id, user_id, token, kind, expires_at, revoked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id.0)
        .bind(&record.token)
        .bind(record.kind.as_str())
        .bind(record.expires_at)
        .bind(record.revoked)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;

        Ok(record)
    }

    async fn find_active(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<Option<TokenRecord>, TokenStoreError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT id, user_id, token, kind, expires_at, revoked, created_at
            FROM tokens
            WHERE token = $1 AND kind = $2 AND revoked = FALSE
            "#,
        )
        .bind(token)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;

        row.map(TokenRow::into_record).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<(), TokenStoreError> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TokenStoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete_by_user_and_kind(
        &self,
        user_id: &UserId,
        kind: TokenKind,
    ) -> Result<u64, TokenStoreError> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1 AND kind = $2")
            .bind(user_id.0)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
