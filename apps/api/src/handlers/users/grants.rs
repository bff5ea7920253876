use super::*;

use stationdesk_domain::{ActionKind, BulkMode, GrantMatrix, ResourceCategory};

use crate::dto::{
    ApplyTemplateRequest, BulkCategoryRequest, BulkResourceRequest, CopyFromRequest,
    GrantMatrixResponse, ReplaceGrantsRequest, SetCellRequest,
};

pub async fn get_grants_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let actor = state
        .permission_admin_service
        .get_grants(&user, user_id_from_path(&user_id)?)
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}

pub async fn replace_grants_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<ReplaceGrantsRequest>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let decoded = GrantMatrix::from_document(&payload.grants);
    if !decoded.ignored_keys.is_empty() {
        tracing::warn!(
            user_id = %user_id,
            ignored_keys = ?decoded.ignored_keys,
            "dropped unknown keys from submitted grant matrix"
        );
    }

    let actor = state
        .permission_admin_service
        .replace_grants(&user, user_id_from_path(&user_id)?, decoded.matrix)
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}

pub async fn set_cell_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<SetCellRequest>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let action = payload.action.parse::<ActionKind>()?;

    let actor = state
        .permission_admin_service
        .set_cell(
            &user,
            user_id_from_path(&user_id)?,
            &payload.resource,
            action,
            payload.value,
        )
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}

pub async fn bulk_resource_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<BulkResourceRequest>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let mode = payload.mode.parse::<BulkMode>()?;

    let actor = state
        .permission_admin_service
        .bulk_resource(&user, user_id_from_path(&user_id)?, &payload.resource, mode)
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}

pub async fn bulk_category_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<BulkCategoryRequest>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let category = payload.category.parse::<ResourceCategory>()?;
    let mode = payload.mode.parse::<BulkMode>()?;

    let actor = state
        .permission_admin_service
        .bulk_category(&user, user_id_from_path(&user_id)?, category, mode)
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}

pub async fn apply_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<ApplyTemplateRequest>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let actor = state
        .permission_admin_service
        .apply_template(&user, user_id_from_path(&user_id)?, &payload.role)
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}

pub async fn copy_from_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<CopyFromRequest>,
) -> ApiResult<Json<GrantMatrixResponse>> {
    let actor = state
        .permission_admin_service
        .copy_from(
            &user,
            user_id_from_path(&user_id)?,
            user_id_from_path(&payload.source_user_id)?,
        )
        .await?;

    Ok(Json(GrantMatrixResponse::from(&actor)))
}
