use super::*;

use stationdesk_domain::{EmailAddress, validate_password};

/// Input payload for creating a user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Display name.
    pub display_name: String,
    /// Optional sign-in email.
    pub email: Option<String>,
    /// Initial role label; seeds the grant matrix.
    pub role: String,
    /// Optional initial password for password sign-in.
    pub password: Option<String>,
}

/// Input payload for profiles seeded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapProfileInput {
    /// Display name.
    pub display_name: String,
    /// Sign-in email.
    pub email: String,
    /// Role label.
    pub role: String,
    /// Password to store, when the provider keeps credentials.
    pub password: Option<String>,
}

impl PermissionAdminService {
    /// Lists all user profiles.
    pub async fn list_users(&self, caller: &UserIdentity) -> AppResult<Vec<Actor>> {
        self.require(caller, ResourceKey::Users, ActionKind::View)
            .await?;
        self.profiles.list_profiles().await
    }

    /// Creates a profile seeded from its role and emits an audit event.
    pub async fn create_user(
        &self,
        caller: &UserIdentity,
        input: CreateUserInput,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Users, ActionKind::Create)
            .await?;

        let actor = self.create_profile(input).await?;

        self.audit(
            caller,
            AuditAction::UserCreated,
            "user_profile",
            actor.id().to_string(),
            format!(
                "created user '{}' with role '{}'",
                actor.display_name().as_str(),
                actor.role()
            ),
        )
        .await?;

        Ok(actor)
    }

    /// Deletes a profile, its grants, its overlay records and its sessions.
    pub async fn delete_user(&self, caller: &UserIdentity, user_id: UserId) -> AppResult<()> {
        self.require(caller, ResourceKey::Users, ActionKind::Delete)
            .await?;

        if caller.subject() == user_id.to_string() {
            return Err(AppError::Conflict(
                "users cannot delete their own profile".to_owned(),
            ));
        }

        let actor = self.load_profile(user_id).await?;
        self.profiles.delete_profile(user_id).await?;
        self.sessions.delete_sessions_for_user(user_id).await?;
        self.module_access.remove_records(user_id).await?;

        self.audit(
            caller,
            AuditAction::UserDeleted,
            "user_profile",
            user_id.to_string(),
            format!("deleted user '{}'", actor.display_name().as_str()),
        )
        .await
    }

    /// Activates or deactivates a profile. Deactivation ends its sessions.
    pub async fn set_user_active(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        is_active: bool,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Users, ActionKind::Edit)
            .await?;

        if !is_active && caller.subject() == user_id.to_string() {
            return Err(AppError::Conflict(
                "users cannot deactivate their own profile".to_owned(),
            ));
        }

        let actor = self.load_profile(user_id).await?;
        self.profiles.set_profile_active(user_id, is_active).await?;
        if !is_active {
            self.sessions.delete_sessions_for_user(user_id).await?;
        }

        self.audit(
            caller,
            AuditAction::UserActivationChanged,
            "user_profile",
            user_id.to_string(),
            format!(
                "set user '{}' active={is_active}",
                actor.display_name().as_str()
            ),
        )
        .await?;

        Ok(actor.with_active(is_active))
    }

    /// Creates a startup profile unless one with the same email exists.
    ///
    /// Runs without a caller and without audit. Returns whether a profile
    /// was created.
    pub async fn ensure_bootstrap_profile(&self, input: BootstrapProfileInput) -> AppResult<bool> {
        let email = EmailAddress::new(&input.email)?;
        if self.profiles.find_profile_by_email(&email).await?.is_some() {
            return Ok(false);
        }

        let actor = self
            .create_profile(CreateUserInput {
                display_name: input.display_name,
                email: Some(input.email),
                role: input.role,
                password: input.password,
            })
            .await?;

        tracing::info!(
            user_id = %actor.id(),
            role = %actor.role(),
            "bootstrap profile created"
        );
        Ok(true)
    }

    async fn create_profile(&self, input: CreateUserInput) -> AppResult<Actor> {
        let email = input
            .email
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(EmailAddress::new)
            .transpose()?;

        let password_hash = match input.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(self.password_hasher.hash_password(password)?)
            }
            None => None,
        };

        let actor = Actor::new(UserId::new(), input.display_name, email, input.role)?;
        self.profiles.create_profile(&actor).await?;

        if let Some(password_hash) = password_hash
            && let Err(error) = self
                .credentials
                .set_password_hash(actor.id(), &password_hash)
                .await
        {
            // Profile and credential exist together or not at all.
            if let Err(cleanup_error) = self.profiles.delete_profile(actor.id()).await {
                tracing::error!(
                    user_id = %actor.id(),
                    error = %cleanup_error,
                    "failed to remove profile after credential write failed"
                );
            }
            return Err(error);
        }

        Ok(actor)
    }
}
