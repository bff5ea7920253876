use axum::Json;
use axum::extract::{Extension, Path, State};
use stationdesk_core::UserIdentity;
use stationdesk_domain::ModuleAccessRecordId;

use crate::dto::{ModuleAccessRecordResponse, UpdateModuleAccessRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::user_id_from_path;

pub async fn list_module_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<ModuleAccessRecordResponse>>> {
    let records = state
        .permission_admin_service
        .list_module_access(&user, user_id_from_path(&user_id)?)
        .await?
        .iter()
        .map(ModuleAccessRecordResponse::from)
        .collect();

    Ok(Json(records))
}

pub async fn update_module_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
    Json(payload): Json<UpdateModuleAccessRequest>,
) -> ApiResult<Json<ModuleAccessRecordResponse>> {
    let record = state
        .permission_admin_service
        .update_module_access(
            &user,
            ModuleAccessRecordId::parse(&record_id)?,
            payload.into(),
        )
        .await?;

    Ok(Json(ModuleAccessRecordResponse::from(&record)))
}
