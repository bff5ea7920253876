use serde::{Deserialize, Serialize};
use stationdesk_domain::Actor;
use ts_rs::TS;

/// Incoming payload for profile creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub password: Option<String>,
}

/// Incoming payload for activation changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-user-active-request.ts"
)]
pub struct SetUserActiveRequest {
    pub is_active: bool,
}

/// API representation of a user profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,
}

impl From<&Actor> for UserResponse {
    fn from(actor: &Actor) -> Self {
        Self {
            user_id: actor.id().to_string(),
            display_name: actor.display_name().as_str().to_owned(),
            email: actor.email().map(|email| email.as_str().to_owned()),
            role: actor.role().as_str().to_owned(),
            is_active: actor.is_active(),
        }
    }
}
