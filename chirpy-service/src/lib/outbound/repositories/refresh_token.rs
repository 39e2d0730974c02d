use async_trait::async_trait;
use auth::RefreshTokenError;
use auth::RefreshTokenRecord;
use auth::RefreshTokenStore;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

/// Refresh token sessions kept in the `refresh_tokens` table.
pub struct PostgresRefreshTokenStore {
    pool: PgPool,
}

impl PostgresRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: PgRow) -> Result<RefreshTokenRecord, RefreshTokenError> {
        Ok(RefreshTokenRecord {
            token: row.try_get("token").map_err(storage_error)?,
            user_id: row.try_get("user_id").map_err(storage_error)?,
            created_at: row.try_get("created_at").map_err(storage_error)?,
            updated_at: row.try_get("updated_at").map_err(storage_error)?,
            expires_at: row.try_get("expires_at").map_err(storage_error)?,
            revoked_at: row.try_get("revoked_at").map_err(storage_error)?,
        })
    }
}

fn storage_error(e: sqlx::Error) -> RefreshTokenError {
    RefreshTokenError::Storage(e.to_string())
}

#[async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    async fn insert(
        &self,
        record: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, RefreshTokenError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&record.token)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.user_id)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(record)
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, RefreshTokenError> {
        sqlx::query(
            r#"
            SELECT token, created_at, updated_at, user_id, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(Self::row_to_record)
        .transpose()
    }

    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, RefreshTokenError> {
        // COALESCE keeps the first revocation time under concurrent revokes
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = COALESCE(revoked_at, $2), updated_at = $2
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}
