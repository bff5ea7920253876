use super::*;

use stationdesk_domain::{BulkMode, GrantMatrix, ResourceCategory};

impl PermissionAdminService {
    /// Returns a profile with its grant matrix.
    pub async fn get_grants(&self, caller: &UserIdentity, user_id: UserId) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::View)
            .await?;
        self.load_profile(user_id).await
    }

    /// Replaces a whole grant matrix. The role label becomes custom.
    pub async fn replace_grants(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        matrix: GrantMatrix,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::Edit)
            .await?;

        let actor = self
            .load_profile(user_id)
            .await?
            .with_edited_matrix(|_| matrix);

        self.save_and_audit(
            caller,
            actor,
            AuditAction::PermissionsReplaced,
            "replaced grant matrix".to_owned(),
        )
        .await
    }

    /// Toggles one cell. Unknown resource keys leave the profile untouched.
    pub async fn set_cell(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        resource_key: &str,
        action: ActionKind,
        value: bool,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::Edit)
            .await?;

        let actor = self.load_profile(user_id).await?;
        let Some(resource) = ResourceKey::parse(resource_key) else {
            tracing::debug!(resource_key, "ignoring cell edit on unknown resource");
            return Ok(actor);
        };

        let actor = actor.with_edited_matrix(|matrix| matrix.set_cell(resource, action, value));
        self.save_and_audit(
            caller,
            actor,
            AuditAction::PermissionCellSet,
            format!("set {resource}.{action}={value}"),
        )
        .await
    }

    /// Applies a bulk mode to one resource row. Unknown resource keys leave
    /// the profile untouched.
    pub async fn bulk_resource(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        resource_key: &str,
        mode: BulkMode,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::Edit)
            .await?;

        let actor = self.load_profile(user_id).await?;
        let Some(resource) = ResourceKey::parse(resource_key) else {
            tracing::debug!(resource_key, "ignoring bulk edit on unknown resource");
            return Ok(actor);
        };

        let actor = actor.with_edited_matrix(|matrix| matrix.bulk_resource(resource, mode));
        self.save_and_audit(
            caller,
            actor,
            AuditAction::PermissionResourceBulkApplied,
            format!("applied {} to {resource}", mode.as_str()),
        )
        .await
    }

    /// Applies a bulk mode to every resource in a category.
    pub async fn bulk_category(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        category: ResourceCategory,
        mode: BulkMode,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::Edit)
            .await?;

        let resources = category.resource_keys();
        let actor = self
            .load_profile(user_id)
            .await?
            .with_edited_matrix(|matrix| matrix.bulk_category(&resources, mode));

        self.save_and_audit(
            caller,
            actor,
            AuditAction::PermissionCategoryBulkApplied,
            format!("applied {} to category {}", mode.as_str(), category.as_str()),
        )
        .await
    }

    /// Replaces the matrix with a role template.
    pub async fn apply_template(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        role: &str,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::Edit)
            .await?;

        let role = role.trim();
        if role.is_empty() {
            return Err(AppError::Validation("role must not be empty".to_owned()));
        }

        let actor = self.load_profile(user_id).await?.with_template(role);
        self.save_and_audit(
            caller,
            actor,
            AuditAction::PermissionTemplateApplied,
            format!("applied template '{role}'"),
        )
        .await
    }

    /// Replaces the matrix with a copy of another profile's matrix.
    pub async fn copy_from(
        &self,
        caller: &UserIdentity,
        user_id: UserId,
        source_id: UserId,
    ) -> AppResult<Actor> {
        self.require(caller, ResourceKey::Permissions, ActionKind::Edit)
            .await?;

        let source = self
            .profiles
            .load_grant_matrix(source_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("user profile '{source_id}' does not exist"))
            })?;

        let actor = self
            .load_profile(user_id)
            .await?
            .with_edited_matrix(|_| GrantMatrix::copy_from(&source));

        self.save_and_audit(
            caller,
            actor,
            AuditAction::PermissionsCopied,
            format!("copied grant matrix from '{source_id}'"),
        )
        .await
    }

    async fn save_and_audit(
        &self,
        caller: &UserIdentity,
        actor: Actor,
        action: AuditAction,
        detail: String,
    ) -> AppResult<Actor> {
        self.profiles
            .save_grant_matrix(actor.id(), actor.role(), actor.grant_matrix())
            .await?;

        self.audit(
            caller,
            action,
            "user_grant_matrix",
            actor.id().to_string(),
            detail,
        )
        .await?;

        Ok(actor)
    }
}
