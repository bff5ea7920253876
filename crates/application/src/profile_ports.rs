use async_trait::async_trait;
use stationdesk_core::AppResult;
use stationdesk_domain::{Actor, EmailAddress, GrantMatrix, RoleLabel, UserId};

/// Repository port for user profiles and their grant matrices.
///
/// Writes are last-write-wins: a save replaces the stored matrix wholesale
/// and carries no concurrency token.
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Persists a new profile. Fails with a conflict when the email is taken.
    async fn create_profile(&self, actor: &Actor) -> AppResult<()>;

    /// Finds a profile by identifier.
    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<Actor>>;

    /// Finds a profile by normalized email address.
    async fn find_profile_by_email(&self, email: &EmailAddress) -> AppResult<Option<Actor>>;

    /// Lists every profile ordered by display name.
    async fn list_profiles(&self) -> AppResult<Vec<Actor>>;

    /// Deletes a profile together with its grant matrix.
    async fn delete_profile(&self, user_id: UserId) -> AppResult<()>;

    /// Sets the active flag on a profile.
    async fn set_profile_active(&self, user_id: UserId, is_active: bool) -> AppResult<()>;

    /// Loads the stored grant matrix.
    async fn load_grant_matrix(&self, user_id: UserId) -> AppResult<Option<GrantMatrix>>;

    /// Replaces the stored grant matrix and role label.
    async fn save_grant_matrix(
        &self,
        user_id: UserId,
        role: &RoleLabel,
        matrix: &GrantMatrix,
    ) -> AppResult<()>;
}
