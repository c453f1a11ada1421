//! Routes for token movement: the host's position-change events.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use traveler_core::scene::{EntityId, Point};
use traveler_portal::application::command_handlers;
use traveler_portal::domain::commands;
use traveler_portal::domain::outcome::TriggerOutcome;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{id}/position.
#[derive(Debug, Deserialize)]
pub struct MoveTokenRequest {
    /// New x coordinate.
    pub x: f64,
    /// New y coordinate.
    pub y: f64,
}

/// POST /{id}/position
///
/// Drops the token at the given point, then reports the move to the portal
/// engine exactly as a host position-change event would. Concurrent requests
/// queue on `position_events`, so each drag and its trigger finish before the
/// next drag starts.
#[instrument(skip(state, request), fields(entity_id = %entity_id))]
async fn move_token(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
    Json(request): Json<MoveTokenRequest>,
) -> Result<Json<TriggerOutcome>, ApiError> {
    let entity_id = EntityId::new(entity_id);
    let _serialized = state.position_events.lock().await;
    state
        .scene
        .drag_entity(&entity_id, Point::new(request.x, request.y))?;

    let command = commands::PositionChanged {
        correlation_id: Uuid::new_v4(),
        entity_id,
    };

    info!(correlation_id = %command.correlation_id, "handling position_changed command");

    let outcome = command_handlers::handle_position_changed(
        &command,
        &state.config,
        state.clock.as_ref(),
        &state.rng,
        &state.store,
        state.scene.as_ref(),
        state.notifier.as_ref(),
    )
    .await?;

    Ok(Json(outcome))
}

/// Returns the router for token movement.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/position", post(move_token))
}
