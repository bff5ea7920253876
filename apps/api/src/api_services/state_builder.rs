use std::sync::Arc;

use stationdesk_application::{
    AuthProvider, ModuleAccessService, PasswordAuthProvider, PasswordHasher,
    PermissionAdminService, PermissionAdminStores, PermissionService,
};
use stationdesk_infrastructure::{Argon2PasswordHasher, StaticAuthProvider};

use crate::api_config::{ApiConfig, AuthProviderConfig};
use crate::state::AppState;

use super::Stores;

pub fn build_app_state(config: &ApiConfig, stores: Stores) -> AppState {
    let session_ttl = chrono::Duration::minutes(config.session_ttl_minutes);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());

    let module_access_service =
        ModuleAccessService::new(stores.module_access.clone(), config.module_access_enabled);
    let permission_service =
        PermissionService::new(stores.profiles.clone(), module_access_service.clone());

    let auth_provider: Arc<dyn AuthProvider> = match &config.auth_provider {
        AuthProviderConfig::Static(accounts) => Arc::new(StaticAuthProvider::new(
            accounts.clone(),
            stores.profiles.clone(),
            session_ttl,
        )),
        AuthProviderConfig::Database { .. } => Arc::new(PasswordAuthProvider::new(
            stores.profiles.clone(),
            stores.credentials.clone(),
            stores.sessions.clone(),
            password_hasher.clone(),
            session_ttl,
        )),
    };

    let permission_admin_service = PermissionAdminService::new(
        permission_service.clone(),
        module_access_service.clone(),
        PermissionAdminStores {
            profiles: stores.profiles,
            credentials: stores.credentials,
            sessions: stores.sessions,
            password_hasher,
            audit_repository: stores.audit,
        },
    );

    AppState {
        permission_service,
        permission_admin_service,
        module_access_service,
        auth_provider,
    }
}
