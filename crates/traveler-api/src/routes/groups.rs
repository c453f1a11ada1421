//! Routes for inspecting portal groups.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;

use traveler_portal::application::query_handlers::{self, GroupGraphView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{group}
#[instrument(skip(state))]
async fn get_group(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<GroupGraphView>, ApiError> {
    let view = query_handlers::get_group_graph(&group, &state.config, state.scene.as_ref()).await?;
    Ok(Json(view))
}

/// Returns the router for portal groups.
pub fn router() -> Router<AppState> {
    Router::new().route("/{group}", get(get_group))
}
