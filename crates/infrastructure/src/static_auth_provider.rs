//! Fixed demo accounts configured at startup.
//!
//! Credentials come from configuration; profiles and grant matrices still
//! live in the profile store so permissions behave exactly as with the
//! database provider. Sessions are held in process memory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use stationdesk_application::{
    AuthProvider, AuthSession, SessionRecord, UserProfileRepository, generate_session_token,
    hash_session_token, identity_for,
};
use stationdesk_core::{AppError, AppResult, UserIdentity};
use stationdesk_domain::EmailAddress;
use tokio::sync::RwLock;


const INVALID_CREDENTIALS: &str = "invalid email or password";

/// One configured demo account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAccount {
    email: EmailAddress,
    password: String,
    display_name: String,
    role: Option<String>,
}

impl StaticAccount {
    /// Creates a demo account.
    pub fn new(
        email: &str,
        password: impl Into<String>,
        display_name: impl Into<String>,
        role: Option<String>,
    ) -> AppResult<Self> {
        let password = password.into();
        let display_name = display_name.into();

        if password.is_empty() {
            return Err(AppError::Validation(format!(
                "static account '{email}' must have a password"
            )));
        }

        if display_name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "static account '{email}' must have a display name"
            )));
        }

        Ok(Self {
            email: EmailAddress::new(email)?,
            password,
            display_name: display_name.trim().to_owned(),
            role: role
                .map(|role| role.trim().to_owned())
                .filter(|role| !role.is_empty()),
        })
    }

    /// Parses `email:password:Display Name[:Role]` entries separated by `;`.
    pub fn parse_list(value: &str) -> AppResult<Vec<Self>> {
        value
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Self::parse_entry)
            .collect()
    }

    fn parse_entry(entry: &str) -> AppResult<Self> {
        let parts: Vec<&str> = entry.split(':').collect();
        match parts.as_slice() {
            [email, password, display_name] => {
                Self::new(email.trim(), *password, *display_name, None)
            }
            [email, password, display_name, role] => Self::new(
                email.trim(),
                *password,
                *display_name,
                Some((*role).to_owned()),
            ),
            _ => Err(AppError::Validation(format!(
                "static account entry '{}' must be email:password:Display Name[:Role]",
                entry.split(':').next().unwrap_or_default()
            ))),
        }
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the plaintext demo password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the configured role label, if any.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Auth provider for fixed demo accounts with in-memory sessions.
pub struct StaticAuthProvider {
    accounts: Vec<StaticAccount>,
    profiles: Arc<dyn UserProfileRepository>,
    sessions: RwLock<HashMap<String, SessionRecord>>,
    session_ttl: Duration,
}

impl StaticAuthProvider {
    /// Creates a provider over configured accounts.
    #[must_use]
    pub fn new(
        accounts: Vec<StaticAccount>,
        profiles: Arc<dyn UserProfileRepository>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            accounts,
            profiles,
            sessions: RwLock::new(HashMap::new()),
            session_ttl,
        }
    }

    /// Returns the configured accounts.
    #[must_use]
    pub fn accounts(&self) -> &[StaticAccount] {
        &self.accounts
    }

    fn matching_account(&self, email: &str, password: &str) -> Option<&StaticAccount> {
        let email = EmailAddress::new(email).ok()?;
        self.accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let Some(account) = self.matching_account(email, password) else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        let Some(actor) = self
            .profiles
            .find_profile_by_email(account.email())
            .await?
            .filter(|actor| actor.is_active())
        else {
            tracing::info!(
                email = account.email().as_str(),
                "static account has no active profile"
            );
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        let (token, token_hash) = generate_session_token()?;
        let now = Utc::now();
        let expires_at = now + self.session_ttl;
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            token_hash.clone(),
            SessionRecord {
                token_hash,
                user_id: actor.id(),
                expires_at,
            },
        );

        Ok(AuthSession {
            token,
            identity: identity_for(&actor),
            expires_at,
        })
    }

    async fn resolve_session(&self, token: &str) -> AppResult<Option<UserIdentity>> {
        let token_hash = hash_session_token(token);
        let Some(session) = self.sessions.read().await.get(&token_hash).cloned() else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            self.sessions.write().await.remove(&token_hash);
            return Ok(None);
        }

        match self.profiles.find_profile(session.user_id).await? {
            Some(actor) if actor.is_active() => Ok(Some(identity_for(&actor))),
            _ => {
                self.sessions.write().await.remove(&token_hash);
                Ok(None)
            }
        }
    }

    async fn sign_out(&self, token: &str) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&hash_session_token(token));
        Ok(())
    }
}
