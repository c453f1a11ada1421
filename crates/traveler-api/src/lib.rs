//! Traveler API: axum adapter hosting the portal engine over an in-memory
//! scene.

use axum::Router;

pub mod camera;
pub mod config;
pub mod error;
pub mod notifier;
pub mod routes;
pub mod scene;
pub mod state;
pub mod ticker;

/// Builds the application router over `state`.
pub fn build_router(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/scene", routes::scene::router())
        .nest("/api/v1/tokens", routes::tokens::router())
        .nest("/api/v1/groups", routes::groups::router())
        .nest("/api/v1/notifications", routes::notifications::router())
        .nest("/api/v1/camera", routes::camera::router())
        .nest("/api/v1/status", routes::status::router())
        .with_state(state)
}
