//! Relocation of an entity onto its resolved destination node.
//!
//! Same-context destinations only move the entity. Cross-context
//! destinations clone it into the destination context and destroy the
//! source once the clone exists; a failed clone leaves the source untouched.

use std::collections::BTreeMap;

use tracing::warn;
use traveler_core::error::TravelerError;
use traveler_core::host::SceneHost;
use traveler_core::scene::{Entity, EntityDraft, Point};

use crate::config::TravelerConfig;
use crate::domain::graph::PortalNode;

/// Host attributes that describe where an entity lives rather than what it
/// is. They are never copied onto a clone.
pub const NON_CARRYABLE_KEYS: &[&str] = &[
    "id", "_id", "pageid", "_pageid", "context_id", "z_order", "_zorder",
];

/// What the executor did.
#[derive(Debug, Clone, PartialEq)]
pub enum Relocation {
    /// Same context: the entity kept its identity and moved.
    Moved {
        /// New position.
        position: Point,
    },
    /// Cross context: this clone replaced the source.
    Cloned {
        /// The clone, with its new identity.
        entity: Entity,
    },
}

/// Builds the clone of `entity` for `destination`.
#[must_use]
pub fn clone_draft(
    entity: &Entity,
    destination: &PortalNode,
    config: &TravelerConfig,
) -> EntityDraft {
    let image = entity
        .image
        .clone()
        .filter(|image| !image.trim().is_empty())
        .unwrap_or_else(|| config.placeholder_image.clone());
    let name = if entity.name.trim().is_empty() {
        config.unnamed_entity.clone()
    } else {
        entity.name.clone()
    };
    let extra: BTreeMap<String, serde_json::Value> = entity
        .extra
        .iter()
        .filter(|(key, _)| !NON_CARRYABLE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    EntityDraft {
        context_id: destination.context_id().clone(),
        name,
        kind: entity.kind,
        position: destination.marker.position,
        image,
        size: entity.size,
        layer: entity.layer.clone(),
        represents: entity.represents.clone(),
        controlled_by: entity.controlled_by.clone(),
        extra,
    }
}

/// Moves or clones `entity` onto `destination`.
///
/// # Errors
///
/// Returns `TravelerError::CreateFailed` if the host refuses the clone (the
/// source is left in place), or the host's error if an in-place move fails.
pub async fn relocate(
    entity: &Entity,
    destination: &PortalNode,
    config: &TravelerConfig,
    host: &dyn SceneHost,
) -> Result<Relocation, TravelerError> {
    let position = destination.marker.position;

    if destination.context_id() == &entity.context_id {
        host.move_entity(&entity.id, position).await?;
        return Ok(Relocation::Moved { position });
    }

    let draft = clone_draft(entity, destination, config);
    let clone = host
        .create_entity(draft)
        .await
        .map_err(|err| match err {
            TravelerError::CreateFailed { .. } => err,
            other => TravelerError::CreateFailed {
                entity_id: entity.id.clone(),
                context_id: destination.context_id().clone(),
                reason: other.to_string(),
            },
        })?;

    // The clone exists at this point; a failed destroy only leaves a duplicate.
    if let Err(err) = host.destroy_entity(&entity.id).await {
        warn!(
            entity_id = %entity.id,
            clone_id = %clone.id,
            error = %err,
            "source entity could not be removed after cloning"
        );
    }

    Ok(Relocation::Cloned { entity: clone })
}

#[cfg(test)]
mod tests {
    use super::*;
    use traveler_core::scene::ContextId;
    use traveler_test_support::{StubScene, marker, token};

    use crate::domain::descriptor::TraversalMode;

    fn node(context: &str) -> PortalNode {
        PortalNode {
            node_id: 2,
            mode: TraversalMode::Ascending,
            marker: marker("m2", "Traveler:City:2", 350.0, 210.0, context),
        }
    }

    #[test]
    fn test_clone_draft_copies_carryable_attributes() {
        let mut entity = token("tok-1", "Bram", 10.0, 10.0, "page-a");
        entity.represents = Some("char-bram".to_owned());
        entity.controlled_by = vec!["alice".to_owned()];
        entity.extra.insert("bar1_value".to_owned(), serde_json::json!(12));
        entity.extra.insert("_pageid".to_owned(), serde_json::json!("page-a"));
        entity.extra.insert("_zorder".to_owned(), serde_json::json!(4));

        let draft = clone_draft(&entity, &node("page-b"), &TravelerConfig::default());

        assert_eq!(draft.context_id, ContextId::new("page-b"));
        assert_eq!(draft.position, Point::new(350.0, 210.0));
        assert_eq!(draft.name, "Bram");
        assert_eq!(draft.image, "images/tok-1.png");
        assert_eq!(draft.represents.as_deref(), Some("char-bram"));
        assert_eq!(draft.controlled_by, vec!["alice".to_owned()]);
        assert_eq!(draft.extra.len(), 1);
        assert_eq!(draft.extra["bar1_value"], serde_json::json!(12));
    }

    #[test]
    fn test_clone_draft_defaults_missing_image_and_name() {
        let mut entity = token("tok-1", "  ", 10.0, 10.0, "page-a");
        entity.image = None;
        let config = TravelerConfig::default();

        let draft = clone_draft(&entity, &node("page-b"), &config);

        assert_eq!(draft.image, config.placeholder_image);
        assert_eq!(draft.name, "Unnamed Token");
    }

    #[tokio::test]
    async fn test_relocate_same_context_moves_in_place() {
        let scene = StubScene::new().with_entity(token("tok-1", "Bram", 10.0, 10.0, "page-a"));
        let entity = scene.entity_snapshot("tok-1").unwrap();

        let result = relocate(&entity, &node("page-a"), &TravelerConfig::default(), &scene)
            .await
            .unwrap();

        assert_eq!(
            result,
            Relocation::Moved {
                position: Point::new(350.0, 210.0)
            }
        );
        let moved = scene.entity_snapshot("tok-1").unwrap();
        assert_eq!(moved.position, Point::new(350.0, 210.0));
        assert!(scene.created_drafts().is_empty());
    }

    #[tokio::test]
    async fn test_relocate_cross_context_clones_then_destroys_source() {
        let scene = StubScene::new().with_entity(token("tok-1", "Bram", 10.0, 10.0, "page-a"));
        let entity = scene.entity_snapshot("tok-1").unwrap();

        let result = relocate(&entity, &node("page-b"), &TravelerConfig::default(), &scene)
            .await
            .unwrap();

        let Relocation::Cloned { entity: clone } = result else {
            panic!("expected Cloned");
        };
        assert_ne!(clone.id, entity.id);
        assert_eq!(clone.context_id, ContextId::new("page-b"));
        assert!(scene.entity_snapshot("tok-1").is_none());
        assert_eq!(scene.destroyed(), vec![entity.id]);
    }

    #[tokio::test]
    async fn test_relocate_failed_clone_keeps_source() {
        let scene = StubScene::new()
            .with_entity(token("tok-1", "Bram", 10.0, 10.0, "page-a"))
            .failing_create("page is archived");
        let entity = scene.entity_snapshot("tok-1").unwrap();

        let result = relocate(&entity, &node("page-b"), &TravelerConfig::default(), &scene).await;

        match result {
            Err(TravelerError::CreateFailed {
                entity_id,
                context_id,
                reason,
            }) => {
                assert_eq!(entity_id, entity.id);
                assert_eq!(context_id, ContextId::new("page-b"));
                assert!(reason.contains("page is archived"));
            }
            other => panic!("expected CreateFailed, got {other:?}"),
        }
        assert!(scene.entity_snapshot("tok-1").is_some());
        assert!(scene.destroyed().is_empty());
    }
}
