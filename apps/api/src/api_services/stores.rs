use std::sync::Arc;

use stationdesk_application::{
    AuditRepository, CredentialRepository, ModuleAccessRepository, SessionRepository,
    UserProfileRepository,
};
use stationdesk_core::AppError;
use stationdesk_infrastructure::{
    InMemoryAuditRepository, InMemoryModuleAccessRepository, InMemorySessionRepository,
    InMemoryUserProfileRepository, PostgresAuditRepository, PostgresCredentialRepository,
    PostgresModuleAccessRepository, PostgresSessionRepository, PostgresUserProfileRepository,
    connect_and_migrate,
};
use tracing::info;

use crate::api_config::StorageConfig;

/// Port implementations for the selected storage backend.
#[derive(Clone)]
pub struct Stores {
    pub profiles: Arc<dyn UserProfileRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub module_access: Arc<dyn ModuleAccessRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let profiles = Arc::new(InMemoryUserProfileRepository::new());

        Self {
            profiles: profiles.clone(),
            credentials: profiles,
            sessions: Arc::new(InMemorySessionRepository::new()),
            module_access: Arc::new(InMemoryModuleAccessRepository::new()),
            audit: Arc::new(InMemoryAuditRepository::new()),
        }
    }
}

pub async fn build_stores(storage: &StorageConfig) -> Result<Stores, AppError> {
    match storage {
        StorageConfig::Memory => {
            info!("using in-memory storage; data is lost on restart");
            Ok(Stores::in_memory())
        }
        StorageConfig::Postgres(pool_config) => {
            let pool = connect_and_migrate(pool_config).await?;
            info!(
                max_connections = pool_config.max_connections,
                "connected to postgres"
            );

            Ok(Stores {
                profiles: Arc::new(PostgresUserProfileRepository::new(pool.clone())),
                credentials: Arc::new(PostgresCredentialRepository::new(pool.clone())),
                sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
                module_access: Arc::new(PostgresModuleAccessRepository::new(pool.clone())),
                audit: Arc::new(PostgresAuditRepository::new(pool)),
            })
        }
    }
}
