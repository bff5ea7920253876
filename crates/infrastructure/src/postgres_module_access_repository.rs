//! PostgreSQL-backed module-access overlay records.

use async_trait::async_trait;
use sqlx::PgPool;

use stationdesk_application::ModuleAccessRepository;
use stationdesk_core::{AppError, AppResult};
use stationdesk_domain::{
    ModuleAccessFlags, ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId, ModuleName,
    UserId,
};

use crate::postgres_pool::storage_error;


/// PostgreSQL implementation of the module-access repository port.
#[derive(Clone)]
pub struct PostgresModuleAccessRepository {
    pool: PgPool,
}

impl PostgresModuleAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ModuleAccessRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    module_name: String,
    create_enabled: bool,
    edit_enabled: bool,
    delete_enabled: bool,
    is_active: bool,
}

impl TryFrom<ModuleAccessRow> for ModuleAccessRecord {
    type Error = AppError;

    fn try_from(row: ModuleAccessRow) -> Result<Self, Self::Error> {
        Ok(ModuleAccessRecord::new(
            ModuleAccessRecordId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.module_name.parse::<ModuleName>()?,
            ModuleAccessFlags {
                create_enabled: row.create_enabled,
                edit_enabled: row.edit_enabled,
                delete_enabled: row.delete_enabled,
            },
            row.is_active,
        ))
    }
}

#[async_trait]
impl ModuleAccessRepository for PostgresModuleAccessRepository {
    async fn load_module_access(&self, user_id: UserId) -> AppResult<Vec<ModuleAccessRecord>> {
        let rows = sqlx::query_as::<_, ModuleAccessRow>(
            r#"
            SELECT id, user_id, module_name, create_enabled, edit_enabled, delete_enabled, is_active
            FROM module_access
            WHERE user_id = $1
            ORDER BY module_name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| storage_error(error, "load module access"))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let module_name = row.module_name.clone();
            match ModuleAccessRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(_) => {
                    tracing::warn!(%user_id, module_name = %module_name, "skipping unknown module-access row");
                }
            }
        }

        Ok(records)
    }

    async fn bulk_create_module_access(
        &self,
        user_id: UserId,
        records: &[ModuleAccessRecord],
    ) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| storage_error(error, "begin module access transaction"))?;

        for record in records {
            if record.user_id() != user_id {
                return Err(AppError::Validation(format!(
                    "module access record '{}' does not belong to user '{user_id}'",
                    record.id()
                )));
            }

            let flags = record.flags();
            sqlx::query(
                r#"
                INSERT INTO module_access (
                    id, user_id, module_name, create_enabled, edit_enabled, delete_enabled, is_active
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (user_id, module_name) DO NOTHING
                "#,
            )
            .bind(record.id().as_uuid())
            .bind(user_id.as_uuid())
            .bind(record.module().as_str())
            .bind(flags.create_enabled)
            .bind(flags.edit_enabled)
            .bind(flags.delete_enabled)
            .bind(record.is_active())
            .execute(&mut *transaction)
            .await
            .map_err(|error| storage_error(error, "create module access"))?;
        }

        transaction
            .commit()
            .await
            .map_err(|error| storage_error(error, "commit module access transaction"))?;

        Ok(())
    }

    async fn update_module_access(
        &self,
        record_id: ModuleAccessRecordId,
        patch: &ModuleAccessPatch,
    ) -> AppResult<ModuleAccessRecord> {
        let row = sqlx::query_as::<_, ModuleAccessRow>(
            r#"
            UPDATE module_access
            SET create_enabled = COALESCE($2, create_enabled),
                edit_enabled = COALESCE($3, edit_enabled),
                delete_enabled = COALESCE($4, delete_enabled),
                is_active = COALESCE($5, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, module_name, create_enabled, edit_enabled, delete_enabled, is_active
            "#,
        )
        .bind(record_id.as_uuid())
        .bind(patch.create_enabled)
        .bind(patch.edit_enabled)
        .bind(patch.delete_enabled)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error(error, "update module access"))?;

        row.map(ModuleAccessRecord::try_from)
            .transpose()?
            .ok_or_else(|| {
                AppError::NotFound(format!("module access record '{record_id}' does not exist"))
            })
    }

    async fn delete_module_access_for_user(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM module_access WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| storage_error(error, "delete module access"))?;

        Ok(())
    }
}
