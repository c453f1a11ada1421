//! Camera request feed.
//!
//! The in-memory host has no real viewers, so camera requests are logged and
//! recorded for clients to inspect through `GET /api/v1/camera`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use traveler_core::camera::CameraDirector;
use traveler_core::clock::Clock;
use traveler_core::error::TravelerError;
use traveler_core::scene::{ContextId, Point};

/// How many camera requests the feed keeps before dropping the oldest.
pub const CAMERA_FEED_CAPACITY: usize = 200;

/// A camera request issued by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CameraRequest {
    /// Viewers were shown a context.
    Associate {
        /// When the request was issued.
        issued_at: DateTime<Utc>,
        /// Context shown.
        context_id: ContextId,
        /// Viewers moved.
        viewers: Vec<String>,
    },
    /// Viewers were centred on a point.
    Focus {
        /// When the request was issued.
        issued_at: DateTime<Utc>,
        /// Context focused in.
        context_id: ContextId,
        /// Point focused on.
        position: Point,
        /// Viewers moved.
        viewers: Vec<String>,
    },
}

/// A [`CameraDirector`] that records the most recent requests.
pub struct FeedCamera {
    clock: Arc<dyn Clock + Send + Sync>,
    requests: Mutex<VecDeque<CameraRequest>>,
    capacity: usize,
}

impl std::fmt::Debug for FeedCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedCamera").finish_non_exhaustive()
    }
}

impl FeedCamera {
    /// Creates an empty feed stamped by `clock`, with the default capacity.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self::with_capacity(clock, CAMERA_FEED_CAPACITY)
    }

    /// Creates an empty feed that keeps at most `capacity` requests.
    #[must_use]
    pub fn with_capacity(clock: Arc<dyn Clock + Send + Sync>, capacity: usize) -> Self {
        Self {
            clock,
            requests: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Returns the retained requests, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<CameraRequest> {
        self.requests
            .lock()
            .map(|requests| requests.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, request: CameraRequest) -> Result<(), TravelerError> {
        let mut requests = self
            .requests
            .lock()
            .map_err(|e| TravelerError::StatePoisoned(format!("camera feed poisoned: {e}")))?;
        if requests.len() == self.capacity {
            requests.pop_front();
        }
        requests.push_back(request);
        Ok(())
    }
}

#[async_trait]
impl CameraDirector for FeedCamera {
    async fn associate_viewers(
        &self,
        context_id: &ContextId,
        viewers: &[String],
    ) -> Result<(), TravelerError> {
        info!(%context_id, ?viewers, "showing context to viewers");
        self.record(CameraRequest::Associate {
            issued_at: self.clock.now(),
            context_id: context_id.clone(),
            viewers: viewers.to_vec(),
        })
    }

    async fn focus(
        &self,
        context_id: &ContextId,
        position: Point,
        viewers: &[String],
    ) -> Result<(), TravelerError> {
        info!(%context_id, x = position.x, y = position.y, ?viewers, "focusing viewers");
        self.record(CameraRequest::Focus {
            issued_at: self.clock.now(),
            context_id: context_id.clone(),
            position,
            viewers: viewers.to_vec(),
        })
    }
}
