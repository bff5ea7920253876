use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use stationdesk_application::CreateUserInput;
use stationdesk_core::UserIdentity;

use crate::dto::{CreateUserRequest, SetUserActiveRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::user_id_from_path;

mod grants;

pub use grants::{
    apply_template_handler, bulk_category_handler, bulk_resource_handler, copy_from_handler,
    get_grants_handler, replace_grants_handler, set_cell_handler,
};

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .permission_admin_service
        .list_users(&user)
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let actor = state
        .permission_admin_service
        .create_user(
            &user,
            CreateUserInput {
                display_name: payload.display_name,
                email: payload.email,
                role: payload.role,
                password: payload.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&actor))))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .permission_admin_service
        .delete_user(&user, user_id_from_path(&user_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_user_active_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<SetUserActiveRequest>,
) -> ApiResult<Json<UserResponse>> {
    let actor = state
        .permission_admin_service
        .set_user_active(&user, user_id_from_path(&user_id)?, payload.is_active)
        .await?;

    Ok(Json(UserResponse::from(&actor)))
}
