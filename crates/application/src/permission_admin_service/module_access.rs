use super::*;

use stationdesk_domain::{ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId};

impl PermissionAdminService {
    /// Lists a user's module-access records, provisioning defaults on first
    /// access.
    pub async fn list_module_access(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<Vec<ModuleAccessRecord>> {
        self.require(caller, ResourceKey::ModuleAccess, ActionKind::View)
            .await?;

        self.load_profile(user_id).await?;
        self.module_access.list_records(user_id).await
    }

    /// Applies an admin patch to one module-access record.
    pub async fn update_module_access(
        &self,
        caller: &UserIdentity,
        record_id: ModuleAccessRecordId,
        patch: ModuleAccessPatch,
    ) -> AppResult<ModuleAccessRecord> {
        self.require(caller, ResourceKey::ModuleAccess, ActionKind::Edit)
            .await?;

        if patch.is_empty() {
            return Err(AppError::Validation(
                "module access patch must change at least one flag".to_owned(),
            ));
        }

        let record = self.module_access.update_record(record_id, &patch).await?;
        let flags = record.flags();

        self.audit(
            caller,
            AuditAction::ModuleAccessUpdated,
            "module_access",
            record_id.to_string(),
            format!(
                "module '{}' for user '{}': create={} edit={} delete={} active={}",
                record.module(),
                record.user_id(),
                flags.create_enabled,
                flags.edit_enabled,
                flags.delete_enabled,
                record.is_active()
            ),
        )
        .await?;

        Ok(record)
    }
}
