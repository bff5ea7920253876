use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::UserIdentityResponse;

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-response.ts"
)]
pub struct AuthLoginResponse {
    pub status: String,
    /// RFC 3339 session expiry.
    pub expires_at: String,
    pub user: UserIdentityResponse,
}
