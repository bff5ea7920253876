use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use stationdesk_application::{SessionRecord, SessionRepository};
use stationdesk_core::AppResult;
use stationdesk_domain::UserId;
use tokio::sync::RwLock;

/// In-memory session store keyed by token hash.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: SessionRecord) -> AppResult<()> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| existing.expires_at > now);
        sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> AppResult<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> AppResult<()> {
        self.sessions.write().await.remove(token_hash);
        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .retain(|_, session| session.user_id != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use stationdesk_application::{SessionRecord, SessionRepository};
    use stationdesk_domain::UserId;

    use super::InMemorySessionRepository;

    fn record(token_hash: &str, user_id: UserId) -> SessionRecord {
        SessionRecord {
            token_hash: token_hash.to_owned(),
            user_id,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn deleting_user_sessions_keeps_other_users() {
        let repository = InMemorySessionRepository::new();
        let cashier = UserId::new();
        let manager = UserId::new();

        for session in [
            record("a", cashier),
            record("b", cashier),
            record("c", manager),
        ] {
            assert!(repository.create_session(session).await.is_ok());
        }

        assert!(repository.delete_sessions_for_user(cashier).await.is_ok());

        assert_eq!(repository.find_session("a").await.unwrap_or_default(), None);
        assert_eq!(repository.find_session("b").await.unwrap_or_default(), None);
        assert_eq!(
            repository
                .find_session("c")
                .await
                .unwrap_or_default()
                .map(|session| session.user_id),
            Some(manager)
        );
    }

    #[tokio::test]
    async fn creating_a_session_evicts_expired_ones() {
        let repository = InMemorySessionRepository::new();
        let user_id = UserId::new();

        let stale = SessionRecord {
            expires_at: Utc::now() - Duration::minutes(1),
            ..record("stale", user_id)
        };
        assert!(repository.create_session(stale).await.is_ok());
        assert!(repository.create_session(record("fresh", user_id)).await.is_ok());

        assert_eq!(
            repository.find_session("stale").await.unwrap_or_default(),
            None
        );
        assert!(
            repository
                .find_session("fresh")
                .await
                .unwrap_or_default()
                .is_some()
        );
    }
}
