use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stationdesk_application::{SessionRecord, SessionRepository};
use stationdesk_core::AppResult;
use stationdesk_domain::UserId;

use crate::postgres_pool::storage_error;

/// PostgreSQL-backed server-side session store.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token_hash: String,
    user_id: uuid::Uuid,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            token_hash: row.token_hash,
            user_id: UserId::from_uuid(row.user_id),
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create_session(&self, session: SessionRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session.token_hash)
        .bind(session.user_id.as_uuid())
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| storage_error(error, "create session"))?;

        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> AppResult<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token_hash, user_id, expires_at
            FROM user_sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error(error, "find session"))?;

        Ok(row.map(SessionRecord::from))
    }

    async fn delete_session(&self, token_hash: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM user_sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|error| storage_error(error, "delete session"))?;

        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| storage_error(error, "delete user sessions"))?;

        Ok(())
    }
}
