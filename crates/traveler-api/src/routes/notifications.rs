//! Routes for travel notifications.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use traveler_portal::application::command_handlers;
use traveler_portal::domain::commands;

use crate::error::ApiError;
use crate::notifier::FeedEntry;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct SetNotificationsRequest {
    /// Whether notifications should be sent.
    pub enabled: bool,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    /// The flag after the change.
    pub enabled: bool,
}

/// GET /
async fn get_feed(State(state): State<AppState>) -> Json<Vec<FeedEntry>> {
    Json(state.notifier.entries())
}

/// POST /
#[instrument(skip(state, request), fields(enabled = request.enabled))]
async fn set_notifications(
    State(state): State<AppState>,
    Json(request): Json<SetNotificationsRequest>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let command = commands::SetNotifications {
        correlation_id: Uuid::new_v4(),
        enabled: request.enabled,
    };
    let enabled = command_handlers::handle_set_notifications(&command, &state.store)?;
    Ok(Json(NotificationsResponse { enabled }))
}

/// Returns the router for notifications.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_feed).post(set_notifications))
}
