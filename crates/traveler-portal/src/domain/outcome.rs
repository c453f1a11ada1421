//! What a position-change event ended up doing.

use serde::Serialize;
use traveler_core::scene::{ContextId, EntityId, Point};

use super::resolver::StayReason;

/// Why an event was dropped before any portal was considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Only tokens travel.
    NotToken,
    /// The entity is itself a portal marker.
    PortalMarker,
    /// The entity is still in its post-teleport cooldown.
    CoolingDown,
}

/// Result of handling one position-change event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// Dropped by a guard.
    Ignored {
        /// Which guard dropped it.
        reason: IgnoreReason,
    },
    /// The entity is not inside any portal of its context.
    NoPortal,
    /// A portal matched but resolved to no movement.
    Stayed {
        /// Group of the portal.
        group: String,
        /// Node id of the portal.
        node_id: i64,
        /// Why nothing moved.
        reason: StayReason,
    },
    /// A circle-entry found no exit.
    NoCircleExit {
        /// Group of the portal.
        group: String,
        /// Node id of the portal.
        node_id: i64,
    },
    /// Moved within the same context.
    Moved {
        /// Group of the portal.
        group: String,
        /// Node id of the triggering portal.
        from_node: i64,
        /// Node id of the destination.
        to_node: i64,
        /// New position.
        position: Point,
    },
    /// Cloned into another context; the source is gone.
    Teleported {
        /// Group of the portal.
        group: String,
        /// Node id of the triggering portal.
        from_node: i64,
        /// Node id of the destination.
        to_node: i64,
        /// Identity of the clone.
        entity_id: EntityId,
        /// Destination context.
        context_id: ContextId,
        /// New position.
        position: Point,
        /// Whether a camera-follow sequence was queued.
        follow_scheduled: bool,
    },
    /// The clone could not be created; the source stays put.
    CreateFailed {
        /// Group of the portal.
        group: String,
        /// Node id of the triggering portal.
        node_id: i64,
        /// Host-supplied reason.
        reason: String,
    },
}
