use async_trait::async_trait;
use stationdesk_core::AppResult;
use stationdesk_domain::{ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId, UserId};

/// Repository port for module-access overlay records.
#[async_trait]
pub trait ModuleAccessRepository: Send + Sync {
    /// Loads every record for one user. An empty list means unprovisioned.
    async fn load_module_access(&self, user_id: UserId) -> AppResult<Vec<ModuleAccessRecord>>;

    /// Inserts a batch of records for one user.
    async fn bulk_create_module_access(
        &self,
        user_id: UserId,
        records: &[ModuleAccessRecord],
    ) -> AppResult<()>;

    /// Applies an admin patch and returns the updated record.
    async fn update_module_access(
        &self,
        record_id: ModuleAccessRecordId,
        patch: &ModuleAccessPatch,
    ) -> AppResult<ModuleAccessRecord>;

    /// Removes every record owned by one user.
    async fn delete_module_access_for_user(&self, user_id: UserId) -> AppResult<()>;
}
