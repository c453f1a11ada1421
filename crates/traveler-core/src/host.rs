//! Host scene port.

use async_trait::async_trait;

use crate::error::TravelerError;
use crate::scene::{ContextId, Entity, EntityDraft, EntityId, Marker, Point};

/// Queries and mutations the engine needs from the host scene.
///
/// The host delivers one position-change event at a time, so implementations
/// never see interleaved calls from two trigger evaluations.
#[async_trait]
pub trait SceneHost: Send + Sync {
    /// Enumerate every marker in every context, in host enumeration order.
    async fn markers(&self) -> Result<Vec<Marker>, TravelerError>;

    /// Look up an entity by id.
    async fn entity(&self, entity_id: &EntityId) -> Result<Option<Entity>, TravelerError>;

    /// Controlling viewers of an entity: its direct controllers united with
    /// those of the template it represents, de-duplicated.
    async fn controllers(&self, entity_id: &EntityId) -> Result<Vec<String>, TravelerError>;

    /// Update an entity's position in place.
    async fn move_entity(&self, entity_id: &EntityId, position: Point)
    -> Result<(), TravelerError>;

    /// Create a new entity. Returns the created entity with its new identity.
    async fn create_entity(&self, draft: EntityDraft) -> Result<Entity, TravelerError>;

    /// Destroy an entity.
    async fn destroy_entity(&self, entity_id: &EntityId) -> Result<(), TravelerError>;

    /// Display name of a context, if the context exists.
    async fn context_name(&self, context_id: &ContextId) -> Result<Option<String>, TravelerError>;
}
