//! Camera-follow port.

use async_trait::async_trait;

use crate::error::TravelerError;
use crate::scene::{ContextId, Point};

/// External collaborator that moves remote viewers' cameras.
///
/// The engine drives it in two steps: viewers are first associated with the
/// destination context, then, after a settling delay, focused on the
/// destination point.
#[async_trait]
pub trait CameraDirector: Send + Sync {
    /// Show `context_id` to each of `viewers`.
    async fn associate_viewers(
        &self,
        context_id: &ContextId,
        viewers: &[String],
    ) -> Result<(), TravelerError>;

    /// Centre each of `viewers` on `position` inside `context_id`.
    async fn focus(
        &self,
        context_id: &ContextId,
        position: Point,
        viewers: &[String],
    ) -> Result<(), TravelerError>;
}
