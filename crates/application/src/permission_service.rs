use std::sync::Arc;

use stationdesk_core::{AppError, AppResult, UserIdentity};
use stationdesk_domain::{
    ActionGrants, ActionKind, Actor, Resource, ResourceKey, UserId, can, capabilities, navigation,
};

use crate::{ModuleAccessService, UserProfileRepository};

/// Application service answering permission questions for signed-in users.
///
/// Loads the actor snapshot and overlay, then defers to the pure evaluator.
#[derive(Clone)]
pub struct PermissionService {
    profiles: Arc<dyn UserProfileRepository>,
    module_access: ModuleAccessService,
}

impl PermissionService {
    /// Creates a new permission service.
    #[must_use]
    pub fn new(profiles: Arc<dyn UserProfileRepository>, module_access: ModuleAccessService) -> Self {
        Self {
            profiles,
            module_access,
        }
    }

    /// Loads the actor behind a session identity. Subjects that are not a
    /// profile identifier resolve to `None`.
    pub async fn actor_for(&self, identity: &UserIdentity) -> AppResult<Option<Actor>> {
        let Ok(user_id) = UserId::parse(identity.subject()) else {
            return Ok(None);
        };

        self.profiles.find_profile(user_id).await
    }

    /// Returns whether the identity may perform the action on the resource.
    pub async fn can(
        &self,
        identity: &UserIdentity,
        resource: ResourceKey,
        action: ActionKind,
    ) -> AppResult<bool> {
        let Some(actor) = self.actor_for(identity).await? else {
            return Ok(false);
        };
        let overlay = self.module_access.overlay_for(actor.id()).await;

        Ok(can(Some(&actor), resource, action, &overlay))
    }

    /// Ensures the identity may perform the action on the resource.
    pub async fn require(
        &self,
        identity: &UserIdentity,
        resource: ResourceKey,
        action: ActionKind,
    ) -> AppResult<()> {
        if self.can(identity, resource, action).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' may not {} '{}'",
            identity.subject(),
            action.as_str(),
            resource.as_str()
        )))
    }

    /// Returns the effective action flags for one resource.
    pub async fn capabilities(
        &self,
        identity: &UserIdentity,
        resource: ResourceKey,
    ) -> AppResult<ActionGrants> {
        let Some(actor) = self.actor_for(identity).await? else {
            return Ok(ActionGrants::NONE);
        };
        let overlay = self.module_access.overlay_for(actor.id()).await;

        Ok(capabilities(Some(&actor), resource, &overlay))
    }

    /// Returns the resources the identity can navigate to.
    pub async fn navigation(&self, identity: &UserIdentity) -> AppResult<Vec<&'static Resource>> {
        let Some(actor) = self.actor_for(identity).await? else {
            return Ok(Vec::new());
        };
        let overlay = self.module_access.overlay_for(actor.id()).await;

        Ok(navigation(Some(&actor), &overlay))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stationdesk_core::UserIdentity;
    use stationdesk_domain::{ActionKind, Actor, ModuleAccessPatch, ModuleName, ResourceKey, UserId};

    use super::PermissionService;
    use crate::ModuleAccessService;
    use crate::test_support::{FakeModuleAccessRepository, FakeProfileRepository};

    fn identity_for(actor: &Actor) -> UserIdentity {
        UserIdentity::new(actor.id().to_string(), "Dana", None)
    }

    async fn service_with(
        actor: Actor,
        overlay_enabled: bool,
    ) -> (PermissionService, ModuleAccessService) {
        let profiles = Arc::new(FakeProfileRepository::default());
        profiles.insert(actor).await;
        let module_access = ModuleAccessService::new(
            Arc::new(FakeModuleAccessRepository::default()),
            overlay_enabled,
        );
        (
            PermissionService::new(profiles, module_access.clone()),
            module_access,
        )
    }

    #[tokio::test]
    async fn require_allows_granted_action() {
        let actor = Actor::new(UserId::new(), "Dana", None, "Cashier")
            .unwrap_or_else(|_| unreachable!());
        let identity = identity_for(&actor);
        let (service, _) = service_with(actor, false).await;

        let result = service
            .require(&identity, ResourceKey::FuelSales, ActionKind::Create)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn require_denies_missing_grant() {
        let actor = Actor::new(UserId::new(), "Dana", None, "Cashier")
            .unwrap_or_else(|_| unreachable!());
        let identity = identity_for(&actor);
        let (service, _) = service_with(actor, false).await;

        let result = service
            .require(&identity, ResourceKey::Permissions, ActionKind::Edit)
            .await;
        assert!(matches!(
            result,
            Err(stationdesk_core::AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn unknown_subject_is_denied() {
        let actor = Actor::new(UserId::new(), "Dana", None, "Administrator")
            .unwrap_or_else(|_| unreachable!());
        let (service, _) = service_with(actor, false).await;

        let stranger = UserIdentity::new(UserId::new().to_string(), "Stranger", None);
        let not_a_profile = UserIdentity::new("demo-admin", "Demo", None);

        assert!(
            !service
                .can(&stranger, ResourceKey::Dashboard, ActionKind::View)
                .await
                .unwrap_or(true)
        );
        assert!(service.navigation(&not_a_profile).await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn overlay_restriction_narrows_capabilities() {
        let actor = Actor::new(UserId::new(), "Dana", None, "Administrator")
            .unwrap_or_else(|_| unreachable!());
        let identity = identity_for(&actor);
        let user_id = actor.id();
        let (service, module_access) = service_with(actor, true).await;

        let records = module_access
            .list_records(user_id)
            .await
            .unwrap_or_default();
        let sales = records
            .iter()
            .find(|record| record.module() == ModuleName::Sales)
            .map(|record| record.id())
            .unwrap_or_else(|| unreachable!());
        let _ = module_access
            .update_record(
                sales,
                &ModuleAccessPatch {
                    create_enabled: Some(false),
                    ..ModuleAccessPatch::default()
                },
            )
            .await;

        let grants = service
            .capabilities(&identity, ResourceKey::FuelSales)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(grants.view);
        assert!(!grants.create);
        assert!(grants.edit);
    }
}
