//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`       - Short link redirect
//! - `GET  /health`       - Health check: database, cache, current policy
//! - `POST /api/shorten`  - Create a short link
//!
//! # Middleware
//!
//! - **Settings** - Loads the policy once per request for shorten and redirect
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{settings, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    let policy_routes = Router::new()
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            settings::layer,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(policy_routes)
        .with_state(state)
        .layer(tracing::layer())
}
