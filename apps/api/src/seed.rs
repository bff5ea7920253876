//! Startup profiles so an empty store is usable.

use stationdesk_application::{BootstrapProfileInput, PermissionAdminService};
use stationdesk_core::AppError;
use stationdesk_domain::RoleTemplate;

use crate::api_config::AuthProviderConfig;

/// Ensures seed profiles exist for the configured provider. Returns how many
/// profiles were created.
pub async fn seed_profiles(
    service: &PermissionAdminService,
    auth_provider: &AuthProviderConfig,
) -> Result<usize, AppError> {
    let mut created = 0;

    for input in bootstrap_inputs(auth_provider) {
        if service.ensure_bootstrap_profile(input).await? {
            created += 1;
        }
    }

    Ok(created)
}

fn bootstrap_inputs(auth_provider: &AuthProviderConfig) -> Vec<BootstrapProfileInput> {
    match auth_provider {
        AuthProviderConfig::Static(accounts) => accounts
            .iter()
            .enumerate()
            .map(|(index, account)| {
                let default_role = if index == 0 {
                    RoleTemplate::Administrator
                } else {
                    RoleTemplate::Employee
                };

                BootstrapProfileInput {
                    display_name: account.display_name().to_owned(),
                    email: account.email().as_str().to_owned(),
                    role: account
                        .role()
                        .unwrap_or(default_role.as_str())
                        .to_owned(),
                    password: None,
                }
            })
            .collect(),
        AuthProviderConfig::Database { bootstrap_admin } => bootstrap_admin
            .iter()
            .map(|admin| BootstrapProfileInput {
                display_name: "Administrator".to_owned(),
                email: admin.email.clone(),
                role: RoleTemplate::Administrator.as_str().to_owned(),
                password: Some(admin.password.clone()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stationdesk_application::UserProfileRepository;
    use stationdesk_domain::EmailAddress;
    use stationdesk_infrastructure::StaticAccount;

    use super::seed_profiles;
    use crate::api_config::{ApiConfig, AuthProviderConfig, BootstrapAdminConfig, StorageConfig};
    use crate::api_services::{Stores, build_app_state};

    fn config(auth_provider: AuthProviderConfig) -> ApiConfig {
        ApiConfig {
            migrate_only: false,
            api_host: "127.0.0.1".to_owned(),
            api_port: 3001,
            frontend_url: "http://localhost:3000".to_owned(),
            storage: StorageConfig::Memory,
            auth_provider,
            session_ttl_minutes: 480,
            cookie_secure: false,
            module_access_enabled: true,
        }
    }

    async fn role_of(profiles: &Arc<dyn UserProfileRepository>, email: &str) -> Option<String> {
        let email = EmailAddress::new(email).unwrap_or_else(|_| unreachable!());
        profiles
            .find_profile_by_email(&email)
            .await
            .unwrap_or_default()
            .map(|actor| actor.role().as_str().to_owned())
    }

    #[tokio::test]
    async fn static_accounts_default_to_administrator_then_employee() {
        let accounts = StaticAccount::parse_list(
            "owner@station.example:pump-one-secret:Owner;\
             clerk@station.example:till-two-secret:Clerk;\
             books@station.example:ledger-secret:Books:Accountant",
        )
        .unwrap_or_default();
        let config = config(AuthProviderConfig::Static(accounts));
        let stores = Stores::in_memory();
        let profiles = stores.profiles.clone();
        let state = build_app_state(&config, stores);

        let created = seed_profiles(&state.permission_admin_service, &config.auth_provider)
            .await
            .unwrap_or_default();
        assert_eq!(created, 3);

        assert_eq!(
            role_of(&profiles, "owner@station.example").await.as_deref(),
            Some("Administrator")
        );
        assert_eq!(
            role_of(&profiles, "clerk@station.example").await.as_deref(),
            Some("Employee")
        );
        assert_eq!(
            role_of(&profiles, "books@station.example").await.as_deref(),
            Some("Accountant")
        );

        let again = seed_profiles(&state.permission_admin_service, &config.auth_provider)
            .await
            .unwrap_or_default();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn database_provider_seeds_admin_that_can_sign_in() {
        let config = config(AuthProviderConfig::Database {
            bootstrap_admin: Some(BootstrapAdminConfig {
                email: "owner@station.example".to_owned(),
                password: "pump-one-secret".to_owned(),
            }),
        });
        let state = build_app_state(&config, Stores::in_memory());

        let created = seed_profiles(&state.permission_admin_service, &config.auth_provider)
            .await
            .unwrap_or_default();
        assert_eq!(created, 1);

        let session = state
            .auth_provider
            .sign_in("owner@station.example", "pump-one-secret")
            .await;
        assert!(session.is_ok());
    }
}
