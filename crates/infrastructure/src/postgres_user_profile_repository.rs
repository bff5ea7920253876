//! PostgreSQL-backed user profile repository.
//!
//! The grant matrix is stored as one JSONB document per profile and decoded
//! into the closed catalog on every read.

use async_trait::async_trait;
use sqlx::PgPool;

use stationdesk_application::UserProfileRepository;
use stationdesk_core::{AppError, AppResult, NonEmptyString};
use stationdesk_domain::{
    Actor, EmailAddress, GrantMatrix, GrantMatrixDocument, RoleLabel, UserId,
};

use crate::postgres_pool::storage_error;

#[cfg(test)]
mod tests;

/// PostgreSQL implementation of the user profile repository port.
#[derive(Clone)]
pub struct PostgresUserProfileRepository {
    pool: PgPool,
}

impl PostgresUserProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserProfileRow {
    id: uuid::Uuid,
    display_name: String,
    email: Option<String>,
    role_label: String,
    grant_matrix: serde_json::Value,
    is_active: bool,
}

impl TryFrom<UserProfileRow> for Actor {
    type Error = AppError;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        let user_id = UserId::from_uuid(row.id);
        let email = row.email.map(EmailAddress::new).transpose()?;

        Ok(Actor::from_parts(
            user_id,
            NonEmptyString::new(row.display_name)?,
            email,
            RoleLabel::new(row.role_label),
            decode_grant_matrix(user_id, row.grant_matrix)?,
            row.is_active,
        ))
    }
}

/// Decodes a stored JSONB document, dropping keys outside the catalog.
pub(crate) fn decode_grant_matrix(
    user_id: UserId,
    value: serde_json::Value,
) -> AppResult<GrantMatrix> {
    let document: GrantMatrixDocument = serde_json::from_value(value).map_err(|error| {
        AppError::Internal(format!(
            "stored grant matrix for user '{user_id}' is malformed: {error}"
        ))
    })?;

    let decoded = GrantMatrix::from_document(&document);
    if !decoded.ignored_keys.is_empty() {
        tracing::warn!(
            %user_id,
            ignored_keys = ?decoded.ignored_keys,
            "dropped unknown keys from stored grant matrix"
        );
    }

    Ok(decoded.matrix)
}

fn encode_grant_matrix(matrix: &GrantMatrix) -> AppResult<serde_json::Value> {
    serde_json::to_value(matrix.to_document())
        .map_err(|error| AppError::Internal(format!("failed to encode grant matrix: {error}")))
}

const PROFILE_COLUMNS: &str = "id, display_name, email, role_label, grant_matrix, is_active";

#[async_trait]
impl UserProfileRepository for PostgresUserProfileRepository {
    async fn create_profile(&self, actor: &Actor) -> AppResult<()> {
        let grant_matrix = encode_grant_matrix(actor.grant_matrix())?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, display_name, email, role_label, grant_matrix, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(actor.id().as_uuid())
        .bind(actor.display_name().as_str())
        .bind(actor.email().map(EmailAddress::as_str))
        .bind(actor.role().as_str())
        .bind(grant_matrix)
        .bind(actor.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| storage_error(error, "create user profile"))?;

        Ok(())
    }

    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<Actor>> {
        let row = sqlx::query_as::<_, UserProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error(error, "find user profile"))?;

        row.map(Actor::try_from).transpose()
    }

    async fn find_profile_by_email(&self, email: &EmailAddress) -> AppResult<Option<Actor>> {
        let row = sqlx::query_as::<_, UserProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE LOWER(email) = LOWER($1) LIMIT 1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error(error, "find user profile by email"))?;

        row.map(Actor::try_from).transpose()
    }

    async fn list_profiles(&self) -> AppResult<Vec<Actor>> {
        let rows = sqlx::query_as::<_, UserProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles ORDER BY display_name, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| storage_error(error, "list user profiles"))?;

        rows.into_iter().map(Actor::try_from).collect()
    }

    async fn delete_profile(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| storage_error(error, "delete user profile"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user profile '{user_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn set_profile_active(&self, user_id: UserId, is_active: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET is_active = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| storage_error(error, "update user profile active flag"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user profile '{user_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn load_grant_matrix(&self, user_id: UserId) -> AppResult<Option<GrantMatrix>> {
        let value = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT grant_matrix FROM user_profiles WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error(error, "load grant matrix"))?;

        value
            .map(|value| decode_grant_matrix(user_id, value))
            .transpose()
    }

    async fn save_grant_matrix(
        &self,
        user_id: UserId,
        role: &RoleLabel,
        matrix: &GrantMatrix,
    ) -> AppResult<()> {
        let grant_matrix = encode_grant_matrix(matrix)?;

        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET grant_matrix = $2, role_label = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(grant_matrix)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| storage_error(error, "save grant matrix"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user profile '{user_id}' does not exist"
            )));
        }

        Ok(())
    }
}
