//! In-memory scene host.
//!
//! The adapter owns the scene itself: contexts, markers and entities are
//! loaded from a YAML document and mutated through the HTTP routes. The
//! portal engine sees the scene only through [`SceneHost`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use traveler_core::error::TravelerError;
use traveler_core::host::SceneHost;
use traveler_core::scene::{
    ContextId, Entity, EntityDraft, EntityId, Marker, Point, merge_controllers,
};
use uuid::Uuid;

use crate::error::AppError;

/// A named context (page) of the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneContext {
    /// Context identifier.
    pub id: ContextId,
    /// Display name.
    pub name: String,
    /// Archived contexts refuse new entities.
    #[serde(default)]
    pub archived: bool,
}

/// On-disk description of a scene.
///
/// ```yaml
/// contexts:
///   - { id: keep, name: The Keep }
/// markers:
///   - id: m1
///     name: "Traveler:Keep:1"
///     position: { x: 100, y: 100 }
///     size: { width: 70, height: 70 }
///     context_id: keep
/// entities: []
/// templates:
///   char-bram: [alice]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    /// Named contexts.
    pub contexts: Vec<SceneContext>,
    /// Placed markers.
    pub markers: Vec<Marker>,
    /// Placed entities.
    pub entities: Vec<Entity>,
    /// Viewers controlling each represented template.
    pub templates: BTreeMap<String, Vec<String>>,
}

impl SceneDocument {
    /// Parses a YAML scene document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SceneDocument` if the YAML does not describe a scene.
    pub fn from_yaml(yaml: &str) -> Result<Self, AppError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML scene document from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SceneFile` if the file cannot be read, or
    /// `AppError::SceneDocument` if it does not describe a scene.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| AppError::SceneFile(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&yaml)
    }
}

/// Snapshot of the whole scene, as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    /// Named contexts.
    pub contexts: Vec<SceneContext>,
    /// Placed markers.
    pub markers: Vec<Marker>,
    /// Placed entities.
    pub entities: Vec<Entity>,
}

/// A scene held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryScene {
    document: Mutex<SceneDocument>,
}

impl InMemoryScene {
    /// Creates a scene from a parsed document.
    #[must_use]
    pub fn new(document: SceneDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SceneDocument>, TravelerError> {
        self.document
            .lock()
            .map_err(|e| TravelerError::StatePoisoned(format!("scene mutex poisoned: {e}")))
    }

    /// Returns every context, marker and entity.
    ///
    /// # Errors
    ///
    /// Returns `TravelerError::StatePoisoned` if the scene cannot be locked.
    pub fn snapshot(&self) -> Result<SceneSnapshot, TravelerError> {
        let document = self.lock()?;
        Ok(SceneSnapshot {
            contexts: document.contexts.clone(),
            markers: document.markers.clone(),
            entities: document.entities.clone(),
        })
    }

    /// Places a marker, replacing any marker with the same id.
    ///
    /// # Errors
    ///
    /// Returns `TravelerError::StatePoisoned` if the scene cannot be locked.
    pub fn place_marker(&self, marker: Marker) -> Result<(), TravelerError> {
        let mut document = self.lock()?;
        document.markers.retain(|m| m.id != marker.id);
        document.markers.push(marker);
        Ok(())
    }

    /// Places an entity, replacing any entity with the same id.
    ///
    /// # Errors
    ///
    /// Returns `TravelerError::StatePoisoned` if the scene cannot be locked.
    pub fn place_entity(&self, entity: Entity) -> Result<(), TravelerError> {
        let mut document = self.lock()?;
        document.entities.retain(|e| e.id != entity.id);
        document.entities.push(entity);
        Ok(())
    }

    /// Moves an entity as a user drag would, without running any portal
    /// logic.
    ///
    /// # Errors
    ///
    /// Returns `TravelerError::EntityNotFound` if the entity does not exist.
    pub fn drag_entity(&self, entity_id: &EntityId, position: Point) -> Result<(), TravelerError> {
        let mut document = self.lock()?;
        let entity = document
            .entities
            .iter_mut()
            .find(|e| &e.id == entity_id)
            .ok_or_else(|| TravelerError::EntityNotFound(entity_id.clone()))?;
        entity.position = position;
        Ok(())
    }
}

#[async_trait]
impl SceneHost for InMemoryScene {
    async fn markers(&self) -> Result<Vec<Marker>, TravelerError> {
        Ok(self.lock()?.markers.clone())
    }

    async fn entity(&self, entity_id: &EntityId) -> Result<Option<Entity>, TravelerError> {
        Ok(self
            .lock()?
            .entities
            .iter()
            .find(|e| &e.id == entity_id)
            .cloned())
    }

    async fn controllers(&self, entity_id: &EntityId) -> Result<Vec<String>, TravelerError> {
        let document = self.lock()?;
        let entity = document
            .entities
            .iter()
            .find(|e| &e.id == entity_id)
            .ok_or_else(|| TravelerError::EntityNotFound(entity_id.clone()))?;
        let template = entity
            .represents
            .as_ref()
            .and_then(|t| document.templates.get(t))
            .map_or(&[][..], Vec::as_slice);
        Ok(merge_controllers(&entity.controlled_by, template))
    }

    async fn move_entity(&self, entity_id: &EntityId, position: Point) -> Result<(), TravelerError> {
        self.drag_entity(entity_id, position)
    }

    async fn create_entity(&self, draft: EntityDraft) -> Result<Entity, TravelerError> {
        let mut document = self.lock()?;
        if document
            .contexts
            .iter()
            .any(|c| c.id == draft.context_id && c.archived)
        {
            return Err(TravelerError::Host(format!(
                "context {} is archived",
                draft.context_id
            )));
        }

        let z_order = document
            .entities
            .iter()
            .filter(|e| e.context_id == draft.context_id)
            .map(|e| e.z_order)
            .max()
            .map_or(0, |top| top + 1);
        let entity = Entity {
            id: EntityId::new(Uuid::now_v7().to_string()),
            name: draft.name,
            kind: draft.kind,
            position: draft.position,
            context_id: draft.context_id,
            image: Some(draft.image),
            size: draft.size,
            layer: draft.layer,
            represents: draft.represents,
            controlled_by: draft.controlled_by,
            z_order,
            extra: draft.extra,
        };
        debug!(entity_id = %entity.id, context_id = %entity.context_id, "entity created");
        document.entities.push(entity.clone());
        Ok(entity)
    }

    async fn destroy_entity(&self, entity_id: &EntityId) -> Result<(), TravelerError> {
        let mut document = self.lock()?;
        let before = document.entities.len();
        document.entities.retain(|e| &e.id != entity_id);
        if document.entities.len() == before {
            return Err(TravelerError::EntityNotFound(entity_id.clone()));
        }
        Ok(())
    }

    async fn context_name(&self, context_id: &ContextId) -> Result<Option<String>, TravelerError> {
        Ok(self
            .lock()?
            .contexts
            .iter()
            .find(|c| &c.id == context_id)
            .map(|c| c.name.clone()))
    }
}
