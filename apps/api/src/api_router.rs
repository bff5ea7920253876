use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use stationdesk_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/permissions/catalog",
            get(handlers::permissions::catalog_handler),
        )
        .route(
            "/api/permissions/templates",
            get(handlers::permissions::list_templates_handler),
        )
        .route(
            "/api/permissions/templates/{role}",
            get(handlers::permissions::template_handler),
        )
        .route(
            "/api/me/navigation",
            get(handlers::me::navigation_handler),
        )
        .route(
            "/api/me/capabilities/{resource}",
            get(handlers::me::capabilities_handler),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/users/{user_id}/active",
            put(handlers::users::set_user_active_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(handlers::users::get_grants_handler).put(handlers::users::replace_grants_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/cell",
            post(handlers::users::set_cell_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/bulk-resource",
            post(handlers::users::bulk_resource_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/bulk-category",
            post(handlers::users::bulk_category_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/apply-template",
            post(handlers::users::apply_template_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/copy-from",
            post(handlers::users::copy_from_handler),
        )
        .route(
            "/api/users/{user_id}/module-access",
            get(handlers::module_access::list_module_access_handler),
        )
        .route(
            "/api/module-access/{record_id}",
            put(handlers::module_access::update_module_access_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
