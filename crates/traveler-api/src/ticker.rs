//! Background camera-follow ticker.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};
use traveler_core::error::TravelerError;
use traveler_portal::application::command_handlers;
use traveler_portal::domain::commands::AdvanceCameraFollows;
use uuid::Uuid;

use crate::state::AppState;

/// Runs one camera tick against the shared state.
///
/// # Errors
///
/// Returns `TravelerError::StatePoisoned` if the engine store cannot be
/// locked.
pub async fn advance_camera(state: &AppState) -> Result<usize, TravelerError> {
    let command = AdvanceCameraFollows {
        correlation_id: Uuid::new_v4(),
    };
    command_handlers::handle_advance_camera_follows(
        &command,
        &state.config,
        state.clock.as_ref(),
        &state.store,
        state.camera.as_ref(),
    )
    .await
}

/// Spawns a task that advances camera-follow sequences every `period`.
pub fn spawn_camera_ticker(state: AppState, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match advance_camera(&state).await {
                Ok(0) => {}
                Ok(steps) => debug!(steps, "camera follow steps performed"),
                Err(err) => warn!(error = %err, "camera tick failed"),
            }
        }
    })
}
