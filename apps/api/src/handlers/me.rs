use axum::Json;
use axum::extract::{Extension, Path, State};
use stationdesk_core::UserIdentity;
use stationdesk_domain::{ActionGrants, ResourceKey};

use crate::dto::{ActionGrantsResponse, CapabilitiesResponse, ResourceResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<ResourceResponse>>> {
    let navigation = state
        .permission_service
        .navigation(&user)
        .await?
        .into_iter()
        .map(ResourceResponse::from)
        .collect();

    Ok(Json(navigation))
}

/// Unknown resource keys evaluate to no capabilities.
pub async fn capabilities_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(resource): Path<String>,
) -> ApiResult<Json<CapabilitiesResponse>> {
    let grants = match ResourceKey::parse(&resource) {
        Some(resource_key) => {
            state
                .permission_service
                .capabilities(&user, resource_key)
                .await?
        }
        None => ActionGrants::NONE,
    };

    Ok(Json(CapabilitiesResponse {
        resource,
        grants: ActionGrantsResponse::from(grants),
    }))
}
