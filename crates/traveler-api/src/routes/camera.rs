//! Routes for camera-follow requests.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::camera::CameraRequest;
use crate::error::ApiError;
use crate::state::AppState;
use crate::ticker;

/// Response body for POST /advance.
#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    /// Camera steps performed by this tick.
    pub steps: usize,
}

/// GET /
async fn get_requests(State(state): State<AppState>) -> Json<Vec<CameraRequest>> {
    Json(state.camera.requests())
}

/// POST /advance
///
/// Runs one camera tick immediately, without waiting for the background
/// ticker.
async fn advance(State(state): State<AppState>) -> Result<Json<AdvanceResponse>, ApiError> {
    let steps = ticker::advance_camera(&state).await?;
    Ok(Json(AdvanceResponse { steps }))
}

/// Returns the router for the camera.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_requests))
        .route("/advance", post(advance))
}
