//! Authentication ports.
//!
//! Every sign-in mechanism implements [`AuthProvider`]; the API selects one at
//! process start and never branches on which one it holds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stationdesk_core::{AppResult, UserIdentity};
use stationdesk_domain::UserId;

/// Session issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Opaque bearer token handed to the client. Never stored in plain form.
    pub token: String,
    /// Identity the token resolves to.
    pub identity: UserIdentity,
    /// Absolute session expiry.
    pub expires_at: DateTime<Utc>,
}

/// Swappable sign-in capability.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the provider name used in logs.
    fn name(&self) -> &'static str;

    /// Verifies credentials and opens a session.
    ///
    /// Every credential failure is reported as the same unauthorized error.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Resolves a session token. Expired or unknown tokens resolve to `None`.
    async fn resolve_session(&self, token: &str) -> AppResult<Option<UserIdentity>>;

    /// Ends a session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &str) -> AppResult<()>;
}

/// Stored session row. Only the SHA-256 hash of the token is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Hex SHA-256 of the raw token.
    pub token_hash: String,
    /// Owning profile.
    pub user_id: UserId,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Repository port for server-side sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new session.
    async fn create_session(&self, session: SessionRecord) -> AppResult<()>;

    /// Finds a session by token hash.
    async fn find_session(&self, token_hash: &str) -> AppResult<Option<SessionRecord>>;

    /// Deletes one session.
    async fn delete_session(&self, token_hash: &str) -> AppResult<()>;

    /// Deletes every session of a user.
    async fn delete_sessions_for_user(&self, user_id: UserId) -> AppResult<()>;
}

/// Repository port for password credentials.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Returns the stored password hash for a user.
    async fn find_password_hash(&self, user_id: UserId) -> AppResult<Option<String>>;

    /// Stores or replaces the password hash for a user.
    async fn set_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
