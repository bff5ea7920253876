use std::collections::HashMap;

use async_trait::async_trait;
use stationdesk_application::{CredentialRepository, UserProfileRepository};
use stationdesk_core::{AppError, AppResult};
use stationdesk_domain::{Actor, EmailAddress, GrantMatrix, RoleLabel, UserId};
use tokio::sync::RwLock;

/// In-memory profile and credential store.
#[derive(Debug, Default)]
pub struct InMemoryUserProfileRepository {
    profiles: RwLock<HashMap<UserId, Actor>>,
    password_hashes: RwLock<HashMap<UserId, String>>,
}

impl InMemoryUserProfileRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing_profile(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user profile '{user_id}' does not exist"))
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn create_profile(&self, actor: &Actor) -> AppResult<()> {
        let mut profiles = self.profiles.write().await;

        if profiles.contains_key(&actor.id()) {
            return Err(AppError::Conflict(format!(
                "user profile '{}' already exists",
                actor.id()
            )));
        }

        if let Some(email) = actor.email()
            && profiles
                .values()
                .any(|existing| existing.email() == Some(email))
        {
            return Err(AppError::Conflict(format!(
                "email '{}' is already in use",
                email.as_str()
            )));
        }

        profiles.insert(actor.id(), actor.clone());
        Ok(())
    }

    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<Actor>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn find_profile_by_email(&self, email: &EmailAddress) -> AppResult<Option<Actor>> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|actor| actor.email() == Some(email))
            .cloned())
    }

    async fn list_profiles(&self) -> AppResult<Vec<Actor>> {
        let mut values: Vec<Actor> = self.profiles.read().await.values().cloned().collect();
        values.sort_by(|left, right| {
            left.display_name()
                .as_str()
                .cmp(right.display_name().as_str())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(values)
    }

    async fn delete_profile(&self, user_id: UserId) -> AppResult<()> {
        self.profiles
            .write()
            .await
            .remove(&user_id)
            .ok_or_else(|| missing_profile(user_id))?;
        self.password_hashes.write().await.remove(&user_id);
        Ok(())
    }

    async fn set_profile_active(&self, user_id: UserId, is_active: bool) -> AppResult<()> {
        let mut profiles = self.profiles.write().await;
        let actor = profiles
            .remove(&user_id)
            .ok_or_else(|| missing_profile(user_id))?;
        profiles.insert(user_id, actor.with_active(is_active));
        Ok(())
    }

    async fn load_grant_matrix(&self, user_id: UserId) -> AppResult<Option<GrantMatrix>> {
        Ok(self
            .profiles
            .read()
            .await
            .get(&user_id)
            .map(|actor| actor.grant_matrix().clone()))
    }

    async fn save_grant_matrix(
        &self,
        user_id: UserId,
        role: &RoleLabel,
        matrix: &GrantMatrix,
    ) -> AppResult<()> {
        let mut profiles = self.profiles.write().await;
        let actor = profiles
            .remove(&user_id)
            .ok_or_else(|| missing_profile(user_id))?;

        let updated = Actor::from_parts(
            actor.id(),
            actor.display_name().clone(),
            actor.email().cloned(),
            role.clone(),
            matrix.clone(),
            actor.is_active(),
        );
        profiles.insert(user_id, updated);
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryUserProfileRepository {
    async fn find_password_hash(&self, user_id: UserId) -> AppResult<Option<String>> {
        Ok(self.password_hashes.read().await.get(&user_id).cloned())
    }

    async fn set_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        if !self.profiles.read().await.contains_key(&user_id) {
            return Err(missing_profile(user_id));
        }

        self.password_hashes
            .write()
            .await
            .insert(user_id, password_hash.to_owned());
        Ok(())
    }
}
