use std::collections::HashMap;

use async_trait::async_trait;
use stationdesk_application::ModuleAccessRepository;
use stationdesk_core::{AppError, AppResult};
use stationdesk_domain::{ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId, UserId};
use tokio::sync::RwLock;

/// In-memory module-access record store.
#[derive(Debug, Default)]
pub struct InMemoryModuleAccessRepository {
    records: RwLock<HashMap<ModuleAccessRecordId, ModuleAccessRecord>>,
}

impl InMemoryModuleAccessRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModuleAccessRepository for InMemoryModuleAccessRepository {
    async fn load_module_access(&self, user_id: UserId) -> AppResult<Vec<ModuleAccessRecord>> {
        let mut values: Vec<ModuleAccessRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.user_id() == user_id)
            .cloned()
            .collect();
        values.sort_by(|left, right| left.module().as_str().cmp(right.module().as_str()));
        Ok(values)
    }

    async fn bulk_create_module_access(
        &self,
        user_id: UserId,
        records: &[ModuleAccessRecord],
    ) -> AppResult<()> {
        let mut stored = self.records.write().await;

        for record in records {
            if record.user_id() != user_id {
                return Err(AppError::Validation(format!(
                    "module access record '{}' does not belong to user '{user_id}'",
                    record.id()
                )));
            }

            // One row per user and module; later duplicates are ignored.
            let exists = stored.values().any(|existing| {
                existing.user_id() == user_id && existing.module() == record.module()
            });
            if !exists {
                stored.insert(record.id(), record.clone());
            }
        }

        Ok(())
    }

    async fn update_module_access(
        &self,
        record_id: ModuleAccessRecordId,
        patch: &ModuleAccessPatch,
    ) -> AppResult<ModuleAccessRecord> {
        let mut stored = self.records.write().await;
        let record = stored.remove(&record_id).ok_or_else(|| {
            AppError::NotFound(format!("module access record '{record_id}' does not exist"))
        })?;

        let updated = record.apply_patch(patch);
        stored.insert(record_id, updated.clone());
        Ok(updated)
    }

    async fn delete_module_access_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.records
            .write()
            .await
            .retain(|_, record| record.user_id() != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stationdesk_application::ModuleAccessRepository;
    use stationdesk_core::AppError;
    use stationdesk_domain::{
        ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId, ModuleName, UserId,
    };

    use super::InMemoryModuleAccessRepository;

    #[tokio::test]
    async fn bulk_create_skips_modules_already_present() {
        let repository = InMemoryModuleAccessRepository::new();
        let user_id = UserId::new();

        let first = ModuleAccessRecord::provisioned_defaults(user_id);
        let second = ModuleAccessRecord::provisioned_defaults(user_id);
        assert!(
            repository
                .bulk_create_module_access(user_id, &first)
                .await
                .is_ok()
        );
        assert!(
            repository
                .bulk_create_module_access(user_id, &second)
                .await
                .is_ok()
        );

        let records = repository
            .load_module_access(user_id)
            .await
            .unwrap_or_default();
        assert_eq!(records.len(), ModuleName::all().len());
    }

    #[tokio::test]
    async fn records_for_another_user_are_rejected() {
        let repository = InMemoryModuleAccessRepository::new();
        let foreign = ModuleAccessRecord::provisioned_default(UserId::new(), ModuleName::Sales);

        let result = repository
            .bulk_create_module_access(UserId::new(), &[foreign])
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_applies_patch_or_reports_missing() {
        let repository = InMemoryModuleAccessRepository::new();
        let user_id = UserId::new();
        let record = ModuleAccessRecord::provisioned_default(user_id, ModuleName::Inventory);
        let record_id = record.id();
        assert!(
            repository
                .bulk_create_module_access(user_id, &[record])
                .await
                .is_ok()
        );

        let patch = ModuleAccessPatch {
            edit_enabled: Some(false),
            is_active: Some(false),
            ..ModuleAccessPatch::default()
        };
        let updated = repository
            .update_module_access(record_id, &patch)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(!updated.flags().edit_enabled);
        assert!(!updated.is_active());

        let missing = repository
            .update_module_access(ModuleAccessRecordId::new(), &patch)
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_for_user_leaves_other_users_records() {
        let repository = InMemoryModuleAccessRepository::new();
        let removed = UserId::new();
        let kept = UserId::new();
        for user_id in [removed, kept] {
            let defaults = ModuleAccessRecord::provisioned_defaults(user_id);
            assert!(
                repository
                    .bulk_create_module_access(user_id, &defaults)
                    .await
                    .is_ok()
            );
        }

        assert!(repository.delete_module_access_for_user(removed).await.is_ok());

        assert!(
            repository
                .load_module_access(removed)
                .await
                .unwrap_or_default()
                .is_empty()
        );
        assert_eq!(
            repository
                .load_module_access(kept)
                .await
                .unwrap_or_default()
                .len(),
            ModuleName::all().len()
        );
    }
}
