use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stationdesk_domain::{Actor, ActionKind, ResourceCategory, Resource};
use ts_rs::TS;

use super::common::{ActionGrantsResponse, ResourceResponse, grant_rows};

/// One catalog category with its pages.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/category-response.ts"
)]
pub struct CategoryResponse {
    pub key: String,
    pub label: String,
    pub resources: Vec<ResourceResponse>,
}

impl CategoryResponse {
    fn new(category: ResourceCategory, resources: &[&Resource]) -> Self {
        Self {
            key: category.as_str().to_owned(),
            label: category.display_label().to_owned(),
            resources: resources
                .iter()
                .map(|resource| ResourceResponse::from(*resource))
                .collect(),
        }
    }
}

/// Full permission catalog.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/catalog-response.ts"
)]
pub struct CatalogResponse {
    pub categories: Vec<CategoryResponse>,
    pub actions: Vec<String>,
}

impl CatalogResponse {
    /// Builds the response from the grouped catalog.
    #[must_use]
    pub fn new(grouped: &[(ResourceCategory, Vec<&'static Resource>)]) -> Self {
        Self {
            categories: grouped
                .iter()
                .map(|(category, resources)| CategoryResponse::new(*category, resources))
                .collect(),
            actions: ActionKind::all()
                .iter()
                .map(|action| action.as_str().to_owned())
                .collect(),
        }
    }
}

/// Default matrix for a role label.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-template-response.ts"
)]
pub struct RoleTemplateResponse {
    pub role: String,
    pub grants: BTreeMap<String, ActionGrantsResponse>,
}

/// A user's role label and grant matrix.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-matrix-response.ts"
)]
pub struct GrantMatrixResponse {
    pub user_id: String,
    pub role: String,
    pub grants: BTreeMap<String, ActionGrantsResponse>,
}

impl From<&Actor> for GrantMatrixResponse {
    fn from(actor: &Actor) -> Self {
        Self {
            user_id: actor.id().to_string(),
            role: actor.role().as_str().to_owned(),
            grants: grant_rows(actor.grant_matrix()),
        }
    }
}

/// Incoming payload replacing a whole grant matrix.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/replace-grants-request.ts"
)]
pub struct ReplaceGrantsRequest {
    pub grants: BTreeMap<String, BTreeMap<String, bool>>,
}

/// Incoming payload toggling one cell.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-cell-request.ts"
)]
pub struct SetCellRequest {
    pub resource: String,
    pub action: String,
    pub value: bool,
}

/// Incoming payload for a whole-row bulk edit.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bulk-resource-request.ts"
)]
pub struct BulkResourceRequest {
    pub resource: String,
    /// `grant_all`, `revoke_all` or `view_only`.
    pub mode: String,
}

/// Incoming payload for a whole-category bulk edit.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bulk-category-request.ts"
)]
pub struct BulkCategoryRequest {
    pub category: String,
    pub mode: String,
}

/// Incoming payload applying a role template.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/apply-template-request.ts"
)]
pub struct ApplyTemplateRequest {
    pub role: String,
}

/// Incoming payload copying another user's matrix.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/copy-from-request.ts"
)]
pub struct CopyFromRequest {
    pub source_user_id: String,
}
