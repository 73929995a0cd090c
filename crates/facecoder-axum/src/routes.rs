//! Route definitions and router construction.

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build all API routes without the `/api` prefix (for nesting under /api).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Images API
        .route("/images", get(handlers::images::list))
        .route("/images/encode", post(handlers::encoding::encode))
        .route(
            "/images/{id}",
            get(handlers::images::get)
                .put(handlers::images::update)
                .delete(handlers::images::remove),
        )
        // Profiles API
        .route(
            "/profiles/{profile_id}/images",
            get(handlers::images::list_by_profile).post(handlers::images::register),
        )
        // Groups API
        .route(
            "/groups/{group_id}/embeddings",
            get(handlers::groups::embeddings),
        )
        .route("/groups/{group_id}/profiles", get(handlers::groups::profiles))
        .route(
            "/groups/{group_id}/encode",
            post(handlers::encoding::refresh_group),
        )
}

/// Create the main Axum router with all API routes.
///
/// Path parameters use the brace syntax: `{id}`, `{group_id}`.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state).layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
