use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use stationdesk_core::AppError;
use tower_sessions::Session;

use crate::auth::SESSION_TOKEN_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session token into a [`stationdesk_core::UserIdentity`]
/// extension, or rejects the request.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = session
        .get::<String>(SESSION_TOKEN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session token: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let Some(identity) = state.auth_provider.resolve_session(&token).await? else {
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to clear session: {error}")))?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
