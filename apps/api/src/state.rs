use std::sync::Arc;

use stationdesk_application::{
    AuthProvider, ModuleAccessService, PermissionAdminService, PermissionService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub permission_service: PermissionService,
    pub permission_admin_service: PermissionAdminService,
    pub module_access_service: ModuleAccessService,
    pub auth_provider: Arc<dyn AuthProvider>,
}
