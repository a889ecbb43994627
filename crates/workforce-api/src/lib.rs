//! HTTP surface of the workforce platform.
//!
//! Every request runs in its own transaction, opened by the application
//! handler it calls.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the front end's origin once it is deployed.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/locations", routes::locations::router())
        .nest("/api/v1/location-tree", routes::location_tree::router())
        .nest("/api/v1/employees", routes::employees::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
