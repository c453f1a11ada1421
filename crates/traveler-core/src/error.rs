//! Engine error types.

use thiserror::Error;

use crate::scene::{ContextId, EntityId};

/// Top-level error type for the portal engine and its host ports.
///
/// Every variant is recoverable: the worst outcome of any of them is an
/// entity that stays where it is.
#[derive(Debug, Error)]
pub enum TravelerError {
    /// The entity named by an event does not exist in the scene.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The host refused to create the clone in the destination context.
    ///
    /// The position-change handler reports this as an outcome; it only
    /// escapes through direct callers of the relocation executor.
    #[error("failed to create {entity_id} in context {context_id}: {reason}")]
    CreateFailed {
        /// The source entity that was being cloned.
        entity_id: EntityId,
        /// The destination context.
        context_id: ContextId,
        /// Host-supplied reason.
        reason: String,
    },

    /// Any other host query or mutation failure.
    #[error("host error: {0}")]
    Host(String),

    /// Shared engine state could not be locked.
    #[error("engine state unavailable: {0}")]
    StatePoisoned(String),
}
