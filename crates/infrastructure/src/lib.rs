//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_audit_repository;
mod in_memory_module_access_repository;
mod in_memory_session_repository;
mod in_memory_user_profile_repository;
mod postgres_audit_repository;
mod postgres_credential_repository;
mod postgres_module_access_repository;
mod postgres_pool;
mod postgres_session_repository;
mod postgres_user_profile_repository;
mod static_auth_provider;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_module_access_repository::InMemoryModuleAccessRepository;
pub use in_memory_session_repository::InMemorySessionRepository;
pub use in_memory_user_profile_repository::InMemoryUserProfileRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_credential_repository::PostgresCredentialRepository;
pub use postgres_module_access_repository::PostgresModuleAccessRepository;
pub use postgres_pool::{PostgresPoolConfig, connect_and_migrate};
pub use postgres_session_repository::PostgresSessionRepository;
pub use postgres_user_profile_repository::PostgresUserProfileRepository;
pub use static_auth_provider::{StaticAccount, StaticAuthProvider};
