//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod auth_ports;
mod module_access_ports;
mod module_access_service;
mod password_auth_provider;
mod permission_admin_service;
mod permission_service;
mod profile_ports;
mod token_crypto;

#[cfg(test)]
mod test_support;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use auth_ports::{
    AuthProvider, AuthSession, CredentialRepository, PasswordHasher, SessionRecord,
    SessionRepository,
};
pub use module_access_ports::ModuleAccessRepository;
pub use module_access_service::ModuleAccessService;
pub use password_auth_provider::{PasswordAuthProvider, identity_for};
pub use permission_admin_service::{
    BootstrapProfileInput, CreateUserInput, PermissionAdminService, PermissionAdminStores,
};
pub use permission_service::PermissionService;
pub use profile_ports::UserProfileRepository;
pub use token_crypto::{generate_session_token, hash_session_token};
