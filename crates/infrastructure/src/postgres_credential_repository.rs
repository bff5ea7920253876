use async_trait::async_trait;
use sqlx::PgPool;

use stationdesk_application::CredentialRepository;
use stationdesk_core::{AppError, AppResult};
use stationdesk_domain::UserId;

use crate::postgres_pool::storage_error;

/// PostgreSQL credential store. Hashes live on the profile row.
#[derive(Clone)]
pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn find_password_hash(&self, user_id: UserId) -> AppResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, Option<String>>(
            "SELECT password_hash FROM user_profiles WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error(error, "find password hash"))?;

        Ok(hash.flatten())
    }

    async fn set_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| storage_error(error, "set password hash"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user profile '{user_id}' does not exist"
            )));
        }

        Ok(())
    }
}
