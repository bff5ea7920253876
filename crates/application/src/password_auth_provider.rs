//! Email and password sign-in against stored Argon2 credentials.
//!
//! Failure paths always spend one hash computation and return the same
//! error so that callers cannot tell unknown emails from wrong passwords.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use stationdesk_core::{AppError, AppResult, UserIdentity};
use stationdesk_domain::{Actor, EmailAddress};

use crate::token_crypto::{generate_session_token, hash_session_token};
use crate::{
    AuthProvider, AuthSession, CredentialRepository, PasswordHasher, SessionRecord,
    SessionRepository, UserProfileRepository,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Auth provider backed by the profile, credential and session stores.
#[derive(Clone)]
pub struct PasswordAuthProvider {
    profiles: Arc<dyn UserProfileRepository>,
    credentials: Arc<dyn CredentialRepository>,
    sessions: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
}

impl PasswordAuthProvider {
    /// Creates a new provider.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn UserProfileRepository>,
        credentials: Arc<dyn CredentialRepository>,
        sessions: Arc<dyn SessionRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            profiles,
            credentials,
            sessions,
            password_hasher,
            session_ttl,
        }
    }

    fn reject(&self, password: &str) -> AppError {
        let _ = self.password_hasher.hash_password(password);
        AppError::Unauthorized(INVALID_CREDENTIALS.to_owned())
    }

    async fn find_active_profile(&self, email: &str) -> AppResult<Option<Actor>> {
        let Ok(email) = EmailAddress::new(email) else {
            return Ok(None);
        };

        Ok(self
            .profiles
            .find_profile_by_email(&email)
            .await?
            .filter(Actor::is_active))
    }
}

#[async_trait]
impl AuthProvider for PasswordAuthProvider {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let Some(actor) = self.find_active_profile(email).await? else {
            return Err(self.reject(password));
        };

        let Some(stored_hash) = self.credentials.find_password_hash(actor.id()).await? else {
            return Err(self.reject(password));
        };

        if !self
            .password_hasher
            .verify_password(password, &stored_hash)?
        {
            tracing::info!(user_id = %actor.id(), "password sign-in rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        let (token, token_hash) = generate_session_token()?;
        let expires_at = Utc::now() + self.session_ttl;
        self.sessions
            .create_session(SessionRecord {
                token_hash,
                user_id: actor.id(),
                expires_at,
            })
            .await?;

        Ok(AuthSession {
            token,
            identity: identity_for(&actor),
            expires_at,
        })
    }

    async fn resolve_session(&self, token: &str) -> AppResult<Option<UserIdentity>> {
        let token_hash = hash_session_token(token);
        let Some(session) = self.sessions.find_session(&token_hash).await? else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            self.sessions.delete_session(&token_hash).await?;
            return Ok(None);
        }

        match self.profiles.find_profile(session.user_id).await? {
            Some(actor) if actor.is_active() => Ok(Some(identity_for(&actor))),
            _ => {
                self.sessions.delete_session(&token_hash).await?;
                Ok(None)
            }
        }
    }

    async fn sign_out(&self, token: &str) -> AppResult<()> {
        self.sessions
            .delete_session(&hash_session_token(token))
            .await
    }
}

/// Builds the session identity for a profile.
#[must_use]
pub fn identity_for(actor: &Actor) -> UserIdentity {
    UserIdentity::new(
        actor.id().to_string(),
        actor.display_name().as_str(),
        actor.email().map(|email| email.as_str().to_owned()),
    )
}
