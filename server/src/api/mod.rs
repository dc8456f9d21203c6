//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, config::Config, visibility, visibility::ScopeCache};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// Resolved-scope cache with explicit invalidation
    pub scopes: Arc<ScopeCache>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        let scopes = Arc::new(ScopeCache::new(Duration::from_secs(config.scope_cache_ttl)));
        Self {
            db,
            config: Arc::new(config),
            scopes,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Room routes: message visibility and permission introspection
    let room_routes = Router::new()
        .route(
            "/api/rooms/{room_id}/messages",
            get(visibility::handlers::list_visible_messages),
        )
        .route(
            "/api/rooms/{room_id}/permissions",
            get(visibility::handlers::effective_permissions),
        );

    // Admin routes: override grants and membership lifecycle
    // (handlers enforce the admin role themselves)
    let admin_routes = Router::new()
        .route(
            "/api/admin/rooms/{room_id}/overrides",
            post(visibility::handlers::grant_override),
        )
        .route(
            "/api/admin/rooms/{room_id}/overrides/{user_id}",
            delete(visibility::handlers::revoke_override),
        )
        .route(
            "/api/admin/rooms/{room_id}/members/{user_id}",
            post(visibility::handlers::add_member)
                .delete(visibility::handlers::remove_member),
        )
        .route(
            "/api/admin/rooms/{room_id}/vessels/{vessel_id}/parties",
            put(visibility::handlers::update_vessel_parties),
        );

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(room_routes)
        .merge(admin_routes)
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        .merge(protected_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Server version
    version: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
