use serde::{Deserialize, Serialize};
use stationdesk_domain::{ModuleAccessPatch, ModuleAccessRecord};
use ts_rs::TS;

/// API representation of one overlay record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/module-access-record-response.ts"
)]
pub struct ModuleAccessRecordResponse {
    pub record_id: String,
    pub user_id: String,
    pub module: String,
    pub create_enabled: bool,
    pub edit_enabled: bool,
    pub delete_enabled: bool,
    pub is_active: bool,
}

impl From<&ModuleAccessRecord> for ModuleAccessRecordResponse {
    fn from(record: &ModuleAccessRecord) -> Self {
        let flags = record.flags();
        Self {
            record_id: record.id().to_string(),
            user_id: record.user_id().to_string(),
            module: record.module().as_str().to_owned(),
            create_enabled: flags.create_enabled,
            edit_enabled: flags.edit_enabled,
            delete_enabled: flags.delete_enabled,
            is_active: record.is_active(),
        }
    }
}

/// Incoming partial update of one overlay record. Absent fields are kept.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-module-access-request.ts"
)]
pub struct UpdateModuleAccessRequest {
    pub create_enabled: Option<bool>,
    pub edit_enabled: Option<bool>,
    pub delete_enabled: Option<bool>,
    pub is_active: Option<bool>,
}

impl From<UpdateModuleAccessRequest> for ModuleAccessPatch {
    fn from(request: UpdateModuleAccessRequest) -> Self {
        Self {
            create_enabled: request.create_enabled,
            edit_enabled: request.edit_enabled,
            delete_enabled: request.delete_enabled,
            is_active: request.is_active,
        }
    }
}
