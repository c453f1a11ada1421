//! Test scene: an in-memory `SceneHost` with failure injection.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use traveler_core::error::TravelerError;
use traveler_core::host::SceneHost;
use traveler_core::scene::{
    ContextId, Entity, EntityDraft, EntityId, EntityKind, Marker, MarkerId, Point, Size,
    merge_controllers,
};

/// Builds a 70×70 marker centred on `(x, y)`.
#[must_use]
pub fn marker(id: &str, name: &str, x: f64, y: f64, context: &str) -> Marker {
    Marker {
        id: MarkerId::new(id),
        name: name.to_owned(),
        position: Point::new(x, y),
        size: Size::new(70.0, 70.0),
        context_id: ContextId::new(context),
    }
}

/// Builds a 70×70 token anchored at `(x, y)`.
#[must_use]
pub fn token(id: &str, name: &str, x: f64, y: f64, context: &str) -> Entity {
    Entity {
        id: EntityId::new(id),
        name: name.to_owned(),
        kind: EntityKind::Token,
        position: Point::new(x, y),
        context_id: ContextId::new(context),
        image: Some(format!("images/{id}.png")),
        size: Size::new(70.0, 70.0),
        layer: "objects".to_owned(),
        represents: None,
        controlled_by: Vec::new(),
        z_order: 0,
        extra: BTreeMap::new(),
    }
}

#[derive(Debug, Default)]
struct Inner {
    markers: Vec<Marker>,
    entities: Vec<Entity>,
    contexts: HashMap<ContextId, String>,
    template_controllers: HashMap<String, Vec<String>>,
    create_failure: Option<String>,
    markers_failure: bool,
    created: Vec<EntityDraft>,
    destroyed: Vec<EntityId>,
    clone_counter: u32,
}

/// A scene held in memory. Clones get ids `clone-1`, `clone-2`, ….
#[derive(Debug, Default)]
pub struct StubScene {
    inner: Mutex<Inner>,
}

impl StubScene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named context.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_context(self, context_id: &str, name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .contexts
            .insert(ContextId::new(context_id), name.to_owned());
        self
    }

    /// Add a marker.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_marker(self, marker: Marker) -> Self {
        self.inner.lock().unwrap().markers.push(marker);
        self
    }

    /// Add an entity.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_entity(self, entity: Entity) -> Self {
        self.inner.lock().unwrap().entities.push(entity);
        self
    }

    /// Register the controllers of a represented template.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_template_controllers(self, template: &str, viewers: &[&str]) -> Self {
        self.inner.lock().unwrap().template_controllers.insert(
            template.to_owned(),
            viewers.iter().map(|v| (*v).to_owned()).collect(),
        );
        self
    }

    /// Make every `create_entity` call fail with `reason`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn failing_create(self, reason: &str) -> Self {
        self.inner.lock().unwrap().create_failure = Some(reason.to_owned());
        self
    }

    /// Make every `markers` call fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn failing_markers(self) -> Self {
        self.inner.lock().unwrap().markers_failure = true;
        self
    }

    /// Allow `create_entity` to succeed again.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn heal_create(&self) {
        self.inner.lock().unwrap().create_failure = None;
    }

    /// Rename a placed marker, as a user editing it between events would.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned or no marker has `marker_id`.
    pub fn rename_marker(&self, marker_id: &str, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        let marker = inner
            .markers
            .iter_mut()
            .find(|m| m.id.as_str() == marker_id)
            .unwrap();
        name.clone_into(&mut marker.name);
    }

    /// Snapshot of one entity.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn entity_snapshot(&self, entity_id: &str) -> Option<Entity> {
        self.inner
            .lock()
            .unwrap()
            .entities
            .iter()
            .find(|e| e.id.as_str() == entity_id)
            .cloned()
    }

    /// Every draft passed to a successful `create_entity`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn created_drafts(&self) -> Vec<EntityDraft> {
        self.inner.lock().unwrap().created.clone()
    }

    /// Every id passed to `destroy_entity`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn destroyed(&self) -> Vec<EntityId> {
        self.inner.lock().unwrap().destroyed.clone()
    }
}

#[async_trait]
impl SceneHost for StubScene {
    async fn markers(&self) -> Result<Vec<Marker>, TravelerError> {
        let inner = self.inner.lock().unwrap();
        if inner.markers_failure {
            return Err(TravelerError::Host("marker query refused".into()));
        }
        Ok(inner.markers.clone())
    }

    async fn entity(&self, entity_id: &EntityId) -> Result<Option<Entity>, TravelerError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .entities
            .iter()
            .find(|e| &e.id == entity_id)
            .cloned())
    }

    async fn controllers(&self, entity_id: &EntityId) -> Result<Vec<String>, TravelerError> {
        let inner = self.inner.lock().unwrap();
        let entity = inner
            .entities
            .iter()
            .find(|e| &e.id == entity_id)
            .ok_or_else(|| TravelerError::EntityNotFound(entity_id.clone()))?;
        let template = entity
            .represents
            .as_ref()
            .and_then(|t| inner.template_controllers.get(t))
            .map_or(&[][..], Vec::as_slice);
        Ok(merge_controllers(&entity.controlled_by, template))
    }

    async fn move_entity(
        &self,
        entity_id: &EntityId,
        position: Point,
    ) -> Result<(), TravelerError> {
        let mut inner = self.inner.lock().unwrap();
        let entity = inner
            .entities
            .iter_mut()
            .find(|e| &e.id == entity_id)
            .ok_or_else(|| TravelerError::EntityNotFound(entity_id.clone()))?;
        entity.position = position;
        Ok(())
    }

    async fn create_entity(&self, draft: EntityDraft) -> Result<Entity, TravelerError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(reason) = &inner.create_failure {
            return Err(TravelerError::Host(reason.clone()));
        }
        inner.clone_counter += 1;
        let entity = Entity {
            id: EntityId::new(format!("clone-{}", inner.clone_counter)),
            name: draft.name.clone(),
            kind: draft.kind,
            position: draft.position,
            context_id: draft.context_id.clone(),
            image: Some(draft.image.clone()),
            size: draft.size,
            layer: draft.layer.clone(),
            represents: draft.represents.clone(),
            controlled_by: draft.controlled_by.clone(),
            z_order: 0,
            extra: draft.extra.clone(),
        };
        inner.created.push(draft);
        inner.entities.push(entity.clone());
        Ok(entity)
    }

    async fn destroy_entity(&self, entity_id: &EntityId) -> Result<(), TravelerError> {
        let mut inner = self.inner.lock().unwrap();
        inner.entities.retain(|e| &e.id != entity_id);
        inner.destroyed.push(entity_id.clone());
        Ok(())
    }

    async fn context_name(&self, context_id: &ContextId) -> Result<Option<String>, TravelerError> {
        Ok(self.inner.lock().unwrap().contexts.get(context_id).cloned())
    }
}
