//! Commands accepted by the portal engine.

use traveler_core::command::Command;
use traveler_core::scene::EntityId;
use uuid::Uuid;

/// The host reports that an entity's position changed.
#[derive(Debug, Clone)]
pub struct PositionChanged {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The entity that moved.
    pub entity_id: EntityId,
}

impl Command for PositionChanged {
    fn command_type(&self) -> &'static str {
        "portal.position_changed"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Turn travel notifications on or off.
#[derive(Debug, Clone)]
pub struct SetNotifications {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// New flag value.
    pub enabled: bool,
}

impl Command for SetNotifications {
    fn command_type(&self) -> &'static str {
        "portal.set_notifications"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Run whatever camera-follow steps are due.
#[derive(Debug, Clone)]
pub struct AdvanceCameraFollows {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for AdvanceCameraFollows {
    fn command_type(&self) -> &'static str {
        "portal.advance_camera_follows"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
