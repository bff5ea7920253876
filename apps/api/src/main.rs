//! Stationdesk API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod seed;
mod state;

use stationdesk_core::AppError;
use stationdesk_infrastructure::connect_and_migrate;
use tracing::info;

use crate::api_config::{ApiConfig, StorageConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_app_state, build_session_layer, build_stores};
use crate::seed::seed_profiles;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        let StorageConfig::Postgres(pool_config) = &config.storage else {
            return Err(AppError::Validation(
                "migrate requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        };
        connect_and_migrate(pool_config).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let stores = build_stores(&config.storage).await?;
    let app_state = build_app_state(&config, stores);

    let seeded = seed_profiles(&app_state.permission_admin_service, &config.auth_provider).await?;
    if seeded > 0 {
        info!(seeded, "created startup profiles");
    }

    let session_layer = build_session_layer(config.cookie_secure, config.session_ttl_minutes);
    let app = build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "stationdesk-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
