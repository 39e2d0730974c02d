use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::ListChirpsQuery;
use crate::domain::chirp::models::SortOrder;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::user::models::UserId;

pub struct PostgresChirpRepository {
    pool: PgPool,
}

impl PostgresChirpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_chirp(row: PgRow) -> Result<Chirp, ChirpError> {
        Ok(Chirp {
            id: ChirpId(row.try_get("id").map_err(database_error)?),
            body: ChirpBody::from_stored(row.try_get("body").map_err(database_error)?),
            user_id: UserId(row.try_get("user_id").map_err(database_error)?),
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

fn database_error(e: sqlx::Error) -> ChirpError {
    ChirpError::DatabaseError(e.to_string())
}

#[async_trait]
impl ChirpRepository for PostgresChirpRepository {
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        sqlx::query(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(chirp.id.0)
        .bind(chirp.body.as_str())
        .bind(chirp.user_id.0)
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(chirp)
    }

    async fn list(&self, query: &ListChirpsQuery) -> Result<Vec<Chirp>, ChirpError> {
        let direction = match query.sort {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };

        // A NULL author matches every row
        let sql = format!(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE $1::uuid IS NULL OR user_id = $1
            ORDER BY created_at {}
            "#,
            direction
        );

        let rows = sqlx::query(&sql)
            .bind(query.author.map(|author| author.0))
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.into_iter().map(Self::row_to_chirp).collect()
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError> {
        sqlx::query(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Self::row_to_chirp)
        .transpose()
    }

    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound(*id));
        }

        Ok(())
    }
}
