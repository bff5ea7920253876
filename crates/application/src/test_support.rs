//! In-process fakes shared by service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use stationdesk_core::{AppError, AppResult};
use stationdesk_domain::{
    Actor, EmailAddress, GrantMatrix, ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId,
    RoleLabel, UserId,
};
use tokio::sync::Mutex;

use crate::{
    AuditEvent, AuditRepository, CredentialRepository, ModuleAccessRepository, PasswordHasher,
    SessionRecord, SessionRepository, UserProfileRepository,
};

#[derive(Default)]
pub struct FakeAuditRepository {
    pub events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeModuleAccessRepository {
    pub records: Mutex<Vec<ModuleAccessRecord>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

#[async_trait]
impl ModuleAccessRepository for FakeModuleAccessRepository {
    async fn load_module_access(&self, user_id: UserId) -> AppResult<Vec<ModuleAccessRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("module access store offline".to_owned()));
        }
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| record.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn bulk_create_module_access(
        &self,
        _user_id: UserId,
        records: &[ModuleAccessRecord],
    ) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("module access store offline".to_owned()));
        }
        self.records.lock().await.extend_from_slice(records);
        Ok(())
    }

    async fn update_module_access(
        &self,
        record_id: ModuleAccessRecordId,
        patch: &ModuleAccessPatch,
    ) -> AppResult<ModuleAccessRecord> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|record| record.id() == record_id)
            .ok_or_else(|| AppError::NotFound(format!("module access record '{record_id}'")))?;
        *record = record.clone().apply_patch(patch);
        Ok(record.clone())
    }

    async fn delete_module_access_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.records
            .lock()
            .await
            .retain(|record| record.user_id() != user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeProfileRepository {
    pub profiles: Mutex<HashMap<UserId, Actor>>,
    pub saves: Mutex<usize>,
}

impl FakeProfileRepository {
    pub async fn insert(&self, actor: Actor) {
        self.profiles.lock().await.insert(actor.id(), actor);
    }

    pub async fn get(&self, user_id: UserId) -> Option<Actor> {
        self.profiles.lock().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl UserProfileRepository for FakeProfileRepository {
    async fn create_profile(&self, actor: &Actor) -> AppResult<()> {
        let mut profiles = self.profiles.lock().await;
        if actor.email().is_some()
            && profiles
                .values()
                .any(|existing| existing.email() == actor.email())
        {
            return Err(AppError::Conflict("email already in use".to_owned()));
        }
        profiles.insert(actor.id(), actor.clone());
        Ok(())
    }

    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<Actor>> {
        Ok(self.profiles.lock().await.get(&user_id).cloned())
    }

    async fn find_profile_by_email(&self, email: &EmailAddress) -> AppResult<Option<Actor>> {
        Ok(self
            .profiles
            .lock()
            .await
            .values()
            .find(|actor| actor.email() == Some(email))
            .cloned())
    }

    async fn list_profiles(&self) -> AppResult<Vec<Actor>> {
        let mut profiles: Vec<Actor> = self.profiles.lock().await.values().cloned().collect();
        profiles.sort_by(|left, right| left.display_name().as_str().cmp(right.display_name().as_str()));
        Ok(profiles)
    }

    async fn delete_profile(&self, user_id: UserId) -> AppResult<()> {
        self.profiles
            .lock()
            .await
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("user profile '{user_id}'")))
    }

    async fn set_profile_active(&self, user_id: UserId, is_active: bool) -> AppResult<()> {
        let mut profiles = self.profiles.lock().await;
        let actor = profiles
            .remove(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user profile '{user_id}'")))?;
        profiles.insert(user_id, actor.with_active(is_active));
        Ok(())
    }

    async fn load_grant_matrix(&self, user_id: UserId) -> AppResult<Option<GrantMatrix>> {
        Ok(self
            .profiles
            .lock()
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
        let mut profiles = self.profiles.lock().await;
        let actor = profiles
            .remove(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user profile '{user_id}'")))?;
        let updated = Actor::from_parts(
            actor.id(),
            actor.display_name().clone(),
            actor.email().cloned(),
            role.clone(),
            matrix.clone(),
            actor.is_active(),
        );
        profiles.insert(user_id, updated);
        *self.saves.lock().await += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSessionRepository {
    pub sessions: Mutex<HashMap<String, SessionRecord>>,
}

#[async_trait]
impl SessionRepository for FakeSessionRepository {
    async fn create_session(&self, session: SessionRecord) -> AppResult<()> {
        self.sessions
            .lock()
            .await
            .insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> AppResult<Option<SessionRecord>> {
        Ok(self.sessions.lock().await.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> AppResult<()> {
        self.sessions.lock().await.remove(token_hash);
        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.sessions
            .lock()
            .await
            .retain(|_, session| session.user_id != user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCredentialRepository {
    pub hashes: Mutex<HashMap<UserId, String>>,
    pub fail_writes: AtomicBool,
}

#[async_trait]
impl CredentialRepository for FakeCredentialRepository {
    async fn find_password_hash(&self, user_id: UserId) -> AppResult<Option<String>> {
        Ok(self.hashes.lock().await.get(&user_id).cloned())
    }

    async fn set_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("credential store offline".to_owned()));
        }
        self.hashes
            .lock()
            .await
            .insert(user_id, password_hash.to_owned());
        Ok(())
    }
}

/// Reversible stand-in for a real hasher that counts hash calls.
#[derive(Default)]
pub struct FakePasswordHasher {
    pub hash_calls: std::sync::atomic::AtomicUsize,
}

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}
