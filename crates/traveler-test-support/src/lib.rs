//! Shared test doubles and utilities for the Traveler portal engine.

mod camera;
mod clock;
mod notifier;
mod rng;
mod scene;

pub use camera::{CameraCall, FailingCamera, RecordingCamera};
pub use clock::{FixedClock, ManualClock};
pub use notifier::RecordingNotifier;
pub use rng::{MockRng, SequenceRng};
pub use scene::{StubScene, marker, token};
