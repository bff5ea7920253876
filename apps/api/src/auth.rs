//! Login, logout and identity handlers.
//!
//! The cookie session carries only the provider's opaque token; every
//! request resolves it through the configured [`AuthProvider`].
//!
//! [`AuthProvider`]: stationdesk_application::AuthProvider

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use stationdesk_core::{AppError, UserIdentity};
use stationdesk_domain::UserId;
use tower_sessions::Session;

use crate::dto::{AuthLoginRequest, AuthLoginResponse, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_TOKEN_KEY: &str = "auth_token";

/// POST /auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<AuthLoginResponse>> {
    let auth_session = state
        .auth_provider
        .sign_in(&payload.email, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    session
        .insert(SESSION_TOKEN_KEY, &auth_session.token)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session token: {error}")))?;

    if let Ok(user_id) = UserId::parse(auth_session.identity.subject()) {
        state.module_access_service.forget(user_id).await;
    }

    tracing::info!(
        provider = state.auth_provider.name(),
        subject = auth_session.identity.subject(),
        "user signed in"
    );

    let user = identity_response(&state, &auth_session.identity).await?;
    Ok(Json(AuthLoginResponse {
        status: "authenticated".to_owned(),
        expires_at: auth_session.expires_at.to_rfc3339(),
        user,
    }))
}

/// POST /auth/logout
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    session: Session,
) -> ApiResult<StatusCode> {
    let token = session
        .get::<String>(SESSION_TOKEN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session token: {error}")))?;

    if let Some(token) = token {
        state.auth_provider.sign_out(&token).await?;
    }

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Ok(user_id) = UserId::parse(user.subject()) {
        state.module_access_service.forget(user_id).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    Ok(Json(identity_response(&state, &user).await?))
}

async fn identity_response(
    state: &AppState,
    identity: &UserIdentity,
) -> ApiResult<UserIdentityResponse> {
    let role = state
        .permission_service
        .actor_for(identity)
        .await?
        .map(|actor| actor.role().as_str().to_owned());
    let navigation = state.permission_service.navigation(identity).await?;

    Ok(UserIdentityResponse::from_identity(
        identity,
        role,
        &navigation,
    ))
}
