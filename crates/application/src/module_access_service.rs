use std::collections::HashMap;
use std::sync::Arc;

use stationdesk_core::AppResult;
use stationdesk_domain::{
    ModuleAccessOverlay, ModuleAccessPatch, ModuleAccessRecord, ModuleAccessRecordId,
    OverlayProvisioning, UserId,
};
use tokio::sync::RwLock;

use crate::ModuleAccessRepository;

#[derive(Debug, Clone)]
struct CachedOverlay {
    state: OverlayProvisioning,
    overlay: ModuleAccessOverlay,
}

/// Loads, provisions and caches module-access overlays per user.
///
/// Overlay resolution never fails: storage errors disable the overlay for the
/// affected user instead of locking them out.
#[derive(Clone)]
pub struct ModuleAccessService {
    repository: Arc<dyn ModuleAccessRepository>,
    enabled: bool,
    cache: Arc<RwLock<HashMap<UserId, CachedOverlay>>>,
}

impl ModuleAccessService {
    /// Creates a new service. A disabled service never vetoes.
    #[must_use]
    pub fn new(repository: Arc<dyn ModuleAccessRepository>, enabled: bool) -> Self {
        Self {
            repository,
            enabled,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns whether the overlay subsystem is switched on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the overlay to evaluate for a user, provisioning default
    /// records on first access.
    pub async fn overlay_for(&self, user_id: UserId) -> ModuleAccessOverlay {
        if !self.enabled {
            return ModuleAccessOverlay::Disabled;
        }

        if let Some(cached) = self.cache.read().await.get(&user_id) {
            return cached.overlay.clone();
        }

        let records = match self.repository.load_module_access(user_id).await {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(%user_id, error = %error, "module access unavailable, overlay skipped");
                return ModuleAccessOverlay::Disabled;
            }
        };

        let cached = if records.is_empty() {
            self.provision(user_id).await
        } else {
            CachedOverlay {
                state: OverlayProvisioning::Provisioned,
                overlay: ModuleAccessOverlay::from_records(&records),
            }
        };

        let overlay = cached.overlay.clone();
        self.cache.write().await.insert(user_id, cached);
        overlay
    }

    /// Returns the cached provisioning state for a user.
    pub async fn provisioning_state(&self, user_id: UserId) -> OverlayProvisioning {
        self.cache
            .read()
            .await
            .get(&user_id)
            .map(|cached| cached.state)
            .unwrap_or_default()
    }

    /// Lists the stored records for a user, provisioning them if needed.
    pub async fn list_records(&self, user_id: UserId) -> AppResult<Vec<ModuleAccessRecord>> {
        if self.enabled {
            let _ = self.overlay_for(user_id).await;
        }
        self.repository.load_module_access(user_id).await
    }

    /// Applies an admin patch and drops the owner's cached overlay.
    pub async fn update_record(
        &self,
        record_id: ModuleAccessRecordId,
        patch: &ModuleAccessPatch,
    ) -> AppResult<ModuleAccessRecord> {
        let record = self
            .repository
            .update_module_access(record_id, patch)
            .await?;
        self.forget(record.user_id()).await;
        Ok(record)
    }

    /// Deletes a user's stored records and their cached overlay.
    pub async fn remove_records(&self, user_id: UserId) -> AppResult<()> {
        self.repository
            .delete_module_access_for_user(user_id)
            .await?;
        self.forget(user_id).await;
        Ok(())
    }

    /// Drops the cached overlay for a user. Called on sign-in and sign-out.
    pub async fn forget(&self, user_id: UserId) {
        self.cache.write().await.remove(&user_id);
    }

    async fn provision(&self, user_id: UserId) -> CachedOverlay {
        let Ok(state) = OverlayProvisioning::Unprovisioned.begin() else {
            return fallback();
        };

        let defaults = ModuleAccessRecord::provisioned_defaults(user_id);
        match self
            .repository
            .bulk_create_module_access(user_id, &defaults)
            .await
        {
            Ok(()) => match state.complete() {
                Ok(state) => {
                    tracing::info!(%user_id, records = defaults.len(), "module access provisioned");
                    CachedOverlay {
                        state,
                        overlay: ModuleAccessOverlay::from_records(&defaults),
                    }
                }
                Err(_) => fallback(),
            },
            Err(error) => {
                tracing::warn!(
                    %user_id,
                    error = %error,
                    "module access provisioning failed, falling back to allow-all"
                );
                fallback()
            }
        }
    }
}

fn fallback() -> CachedOverlay {
    let state = OverlayProvisioning::Provisioning
        .fail()
        .and_then(OverlayProvisioning::fall_back)
        .unwrap_or(OverlayProvisioning::FallbackAllowAll);

    CachedOverlay {
        state,
        overlay: ModuleAccessOverlay::Disabled,
    }
}
