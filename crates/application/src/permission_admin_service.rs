use std::sync::Arc;

use stationdesk_core::{AppError, AppResult, UserIdentity};
use stationdesk_domain::{ActionKind, Actor, AuditAction, ResourceKey, UserId};

use crate::{
    AuditEvent, AuditRepository, CredentialRepository, ModuleAccessService, PasswordHasher,
    PermissionService, SessionRepository, UserProfileRepository,
};

mod grants;
mod module_access;
mod users;


pub use users::{BootstrapProfileInput, CreateUserInput};

/// Application service for user and permission administration.
///
/// Every operation checks the caller against the grant matrix and appends an
/// audit event after a successful write.
#[derive(Clone)]
pub struct PermissionAdminService {
    permission_service: PermissionService,
    module_access: ModuleAccessService,
    profiles: Arc<dyn UserProfileRepository>,
    credentials: Arc<dyn CredentialRepository>,
    sessions: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
}

/// Storage dependencies of [`PermissionAdminService`].
#[derive(Clone)]
pub struct PermissionAdminStores {
    /// Profile and grant matrix storage.
    pub profiles: Arc<dyn UserProfileRepository>,
    /// Password credential storage.
    pub credentials: Arc<dyn CredentialRepository>,
    /// Server-side session storage.
    pub sessions: Arc<dyn SessionRepository>,
    /// Password hashing.
    pub password_hasher: Arc<dyn PasswordHasher>,
    /// Append-only audit log.
    pub audit_repository: Arc<dyn AuditRepository>,
}

impl PermissionAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        permission_service: PermissionService,
        module_access: ModuleAccessService,
        stores: PermissionAdminStores,
    ) -> Self {
        Self {
            permission_service,
            module_access,
            profiles: stores.profiles,
            credentials: stores.credentials,
            sessions: stores.sessions,
            password_hasher: stores.password_hasher,
            audit_repository: stores.audit_repository,
        }
    }

    async fn require(
        &self,
        caller: &UserIdentity,
        resource: ResourceKey,
        action: ActionKind,
    ) -> AppResult<()> {
        self.permission_service
            .require(caller, resource, action)
            .await
    }

    async fn load_profile(&self, user_id: UserId) -> AppResult<Actor> {
        self.profiles
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user profile '{user_id}' does not exist")))
    }

    async fn audit(
        &self,
        caller: &UserIdentity,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: caller.subject().to_owned(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
