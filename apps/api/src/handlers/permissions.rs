use axum::Json;
use axum::extract::Path;
use stationdesk_domain::{RoleTemplate, get_template, list_resources_by_category};

use crate::dto::{CatalogResponse, RoleTemplateResponse, grant_rows};

pub async fn catalog_handler() -> Json<CatalogResponse> {
    Json(CatalogResponse::new(&list_resources_by_category()))
}

pub async fn list_templates_handler() -> Json<Vec<String>> {
    Json(
        RoleTemplate::all()
            .iter()
            .map(|template| template.as_str().to_owned())
            .collect(),
    )
}

/// Unknown role labels resolve to the minimal-access fallback.
pub async fn template_handler(Path(role): Path<String>) -> Json<RoleTemplateResponse> {
    let matrix = get_template(&role);
    if RoleTemplate::find(&role).is_none() {
        tracing::debug!(role = %role, "no authored template; returning minimal access");
    }

    Json(RoleTemplateResponse {
        role,
        grants: grant_rows(&matrix),
    })
}
