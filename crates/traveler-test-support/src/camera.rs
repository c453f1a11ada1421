//! Test cameras: mock `CameraDirector` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use traveler_core::camera::CameraDirector;
use traveler_core::error::TravelerError;
use traveler_core::scene::{ContextId, Point};

/// One call made against a camera double.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCall {
    /// `associate_viewers` was called.
    Associate {
        /// Context shown.
        context_id: ContextId,
        /// Viewers moved.
        viewers: Vec<String>,
    },
    /// `focus` was called.
    Focus {
        /// Context focused in.
        context_id: ContextId,
        /// Point focused on.
        position: Point,
        /// Viewers moved.
        viewers: Vec<String>,
    },
}

/// A camera that records every call and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingCamera {
    calls: Mutex<Vec<CameraCall>>,
}

impl RecordingCamera {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<CameraCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CameraDirector for RecordingCamera {
    async fn associate_viewers(
        &self,
        context_id: &ContextId,
        viewers: &[String],
    ) -> Result<(), TravelerError> {
        self.calls.lock().unwrap().push(CameraCall::Associate {
            context_id: context_id.clone(),
            viewers: viewers.to_vec(),
        });
        Ok(())
    }

    async fn focus(
        &self,
        context_id: &ContextId,
        position: Point,
        viewers: &[String],
    ) -> Result<(), TravelerError> {
        self.calls.lock().unwrap().push(CameraCall::Focus {
            context_id: context_id.clone(),
            position,
            viewers: viewers.to_vec(),
        });
        Ok(())
    }
}

/// A camera that always returns a host error. Useful for testing that camera
/// failures never disturb the engine.
#[derive(Debug)]
pub struct FailingCamera;

#[async_trait]
impl CameraDirector for FailingCamera {
    async fn associate_viewers(
        &self,
        _context_id: &ContextId,
        _viewers: &[String],
    ) -> Result<(), TravelerError> {
        Err(TravelerError::Host("camera offline".into()))
    }

    async fn focus(
        &self,
        _context_id: &ContextId,
        _position: Point,
        _viewers: &[String],
    ) -> Result<(), TravelerError> {
        Err(TravelerError::Host("camera offline".into()))
    }
}
