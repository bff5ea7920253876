use serde_json::json;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use stationdesk_application::UserProfileRepository;
use stationdesk_core::AppError;
use stationdesk_domain::{
    ActionKind, Actor, BulkMode, EmailAddress, ResourceKey, RoleLabel, UserId,
};

use super::{PostgresUserProfileRepository, decode_grant_matrix};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for user profile tests: {error}");
    }

    Some(pool)
}

fn unique_email(prefix: &str) -> EmailAddress {
    EmailAddress::new(format!("{prefix}-{}@station.example", UserId::new()))
        .unwrap_or_else(|_| unreachable!())
}

#[test]
fn decode_drops_unknown_keys_and_defaults_missing_actions() {
    let value = json!({
        "orders": { "view": true, "delete": true },
        "fuel_pumps": { "view": true },
        "dashboard": { "view": true, "approve": true }
    });

    let matrix = decode_grant_matrix(UserId::new(), value).unwrap_or_else(|_| unreachable!());

    assert!(matrix.get(ResourceKey::Orders, ActionKind::Delete));
    assert!(!matrix.get(ResourceKey::Orders, ActionKind::Edit));
    assert!(matrix.get(ResourceKey::Dashboard, ActionKind::View));
    assert!(!matrix.get(ResourceKey::Employees, ActionKind::View));
}

#[test]
fn decode_rejects_non_boolean_flags() {
    let value = json!({ "orders": { "view": "yes" } });
    let result = decode_grant_matrix(UserId::new(), value);
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn saved_matrix_loads_back_unchanged() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresUserProfileRepository::new(pool);

    let actor = Actor::new(UserId::new(), "Jordan", Some(unique_email("jordan")), "Employee")
        .unwrap_or_else(|_| unreachable!());
    assert!(repository.create_profile(&actor).await.is_ok());

    let edited = actor
        .clone()
        .with_edited_matrix(|matrix| matrix.bulk_resource(ResourceKey::Orders, BulkMode::GrantAll));
    let saved = repository
        .save_grant_matrix(edited.id(), edited.role(), edited.grant_matrix())
        .await;
    assert!(saved.is_ok());

    let loaded = repository
        .load_grant_matrix(actor.id())
        .await
        .unwrap_or_default();
    assert_eq!(loaded.as_ref(), Some(edited.grant_matrix()));

    let profile = repository
        .find_profile(actor.id())
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    assert_eq!(profile.role(), &RoleLabel::custom());
}

#[tokio::test]
async fn duplicate_email_conflicts_and_missing_profile_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresUserProfileRepository::new(pool);
    let email = unique_email("owner");

    let first = Actor::new(UserId::new(), "Owner", Some(email.clone()), "Administrator")
        .unwrap_or_else(|_| unreachable!());
    let second = Actor::new(UserId::new(), "Owner Two", Some(email.clone()), "Cashier")
        .unwrap_or_else(|_| unreachable!());

    assert!(repository.create_profile(&first).await.is_ok());
    assert!(matches!(
        repository.create_profile(&second).await,
        Err(AppError::Conflict(_))
    ));

    let found = repository
        .find_profile_by_email(&email)
        .await
        .unwrap_or_default();
    assert_eq!(found.map(|actor| actor.id()), Some(first.id()));

    assert!(matches!(
        repository.delete_profile(UserId::new()).await,
        Err(AppError::NotFound(_))
    ));
}
