//! Engine status endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};

use traveler_portal::application::query_handlers::{self, EngineStatusView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn get_status(State(state): State<AppState>) -> Result<Json<EngineStatusView>, ApiError> {
    Ok(Json(query_handlers::get_engine_status(
        state.clock.as_ref(),
        &state.store,
    )?))
}

/// Returns the router for engine status.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_status))
}
