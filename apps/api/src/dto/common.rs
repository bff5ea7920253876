use std::collections::BTreeMap;

use serde::Serialize;
use stationdesk_core::UserIdentity;
use stationdesk_domain::{ActionGrants, GrantMatrix, Resource};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One catalog page.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/resource-response.ts"
)]
pub struct ResourceResponse {
    pub key: String,
    pub label: String,
    pub category: String,
}

impl From<&Resource> for ResourceResponse {
    fn from(resource: &Resource) -> Self {
        Self {
            key: resource.key().as_str().to_owned(),
            label: resource.display_label().to_owned(),
            category: resource.category().as_str().to_owned(),
        }
    }
}

/// Six action flags for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/action-grants-response.ts"
)]
pub struct ActionGrantsResponse {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
    pub export: bool,
    pub print: bool,
}

impl From<ActionGrants> for ActionGrantsResponse {
    fn from(grants: ActionGrants) -> Self {
        Self {
            view: grants.view,
            create: grants.create,
            edit: grants.edit,
            delete: grants.delete,
            export: grants.export,
            print: grants.print,
        }
    }
}

/// Keys every row of a matrix by its resource transport key.
pub fn grant_rows(matrix: &GrantMatrix) -> BTreeMap<String, ActionGrantsResponse> {
    matrix
        .rows()
        .map(|(key, row)| (key.as_str().to_owned(), ActionGrantsResponse::from(row)))
        .collect()
}

/// Evaluated capabilities of the caller for one resource.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/capabilities-response.ts"
)]
pub struct CapabilitiesResponse {
    pub resource: String,
    pub grants: ActionGrantsResponse,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// Pages the user may view, in catalog order.
    pub navigation: Vec<ResourceResponse>,
}

impl UserIdentityResponse {
    /// Creates a response from the identity, its role label and navigation.
    #[must_use]
    pub fn from_identity(
        identity: &UserIdentity,
        role: Option<String>,
        navigation: &[&Resource],
    ) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role,
            navigation: navigation
                .iter()
                .map(|resource| ResourceResponse::from(*resource))
                .collect(),
        }
    }
}
