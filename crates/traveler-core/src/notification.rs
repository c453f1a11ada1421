//! Structured notifications emitted to the external notifier.
//!
//! The engine never formats display text; it hands these payloads to a
//! [`Notifier`] which decides how (and whether) to render them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scene::ContextId;

/// Metadata attached to every notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMetadata {
    /// Unique notification identifier.
    pub notification_id: Uuid,
    /// Correlation ID of the command that produced it.
    pub correlation_id: Uuid,
    /// Timestamp of emission.
    pub occurred_at: DateTime<Utc>,
}

/// What happened to the entity at a portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortalOutcome {
    /// The entity stepped onto the portal.
    Entered,
    /// The entity left the group at another node.
    Exited {
        /// Node id of the destination.
        node_id: i64,
    },
    /// The entity was cloned into another context.
    Teleported {
        /// Destination context.
        context_id: ContextId,
        /// Display name of the destination context, if the host knows it.
        context_name: Option<String>,
    },
    /// A circle-entry found no circle-exit in its group.
    NoCircleExit,
    /// The clone could not be created; the entity stays.
    CreateFailed {
        /// Host-supplied reason.
        reason: String,
    },
}

/// How an external renderer should treat a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Routine travel report.
    Info,
    /// Recoverable failure; the entity did not move.
    Warning,
}

/// A structured notification payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification metadata.
    pub metadata: NotificationMetadata,
    /// Display name of the travelling entity.
    pub entity_name: String,
    /// Group of the triggering portal.
    pub group: String,
    /// Node id of the triggering portal.
    pub node_id: i64,
    /// Traversal mode of the triggering portal.
    pub mode: String,
    /// Outcome being reported.
    pub outcome: PortalOutcome,
}

impl Notification {
    /// Returns the severity implied by the outcome.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self.outcome {
            PortalOutcome::NoCircleExit | PortalOutcome::CreateFailed { .. } => Severity::Warning,
            PortalOutcome::Entered
            | PortalOutcome::Exited { .. }
            | PortalOutcome::Teleported { .. } => Severity::Info,
        }
    }
}

/// External collaborator that renders notifications to a human audience.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Delivery is fire-and-forget.
    async fn notify(&self, notification: Notification);
}
