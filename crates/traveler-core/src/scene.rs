//! Scene model shared between the host and the engine.
//!
//! Markers and entities are owned by the host; the engine only reads them
//! and asks the host to mutate them through [`crate::host::SceneHost`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a host-assigned identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

string_id!(
    /// Host identifier of a movable entity.
    EntityId
);
string_id!(
    /// Host identifier of a scene context (map/page).
    ContextId
);
string_id!(
    /// Host identifier of a placed marker.
    MarkerId
);

/// A point in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A placed scene object whose display name may encode portal metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Host identifier.
    pub id: MarkerId,
    /// Raw display name, e.g. `Traveler:City:2:descending`.
    pub name: String,
    /// Centre of the marker.
    pub position: Point,
    /// Bounding size around the centre.
    pub size: Size,
    /// Context the marker is placed in.
    pub context_id: ContextId,
}

/// What sort of scene object an entity is. Only tokens travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A movable token.
    #[default]
    Token,
    /// Anything else the host reports position changes for (cards, etc.).
    Other,
}

/// A movable scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable host identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Token or other.
    #[serde(default)]
    pub kind: EntityKind,
    /// Anchor point.
    pub position: Point,
    /// Owning context.
    pub context_id: ContextId,
    /// Appearance reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Rendered size.
    pub size: Size,
    /// Host layer the entity is drawn on.
    #[serde(default = "default_layer")]
    pub layer: String,
    /// Template (character sheet) the entity represents, if any.
    #[serde(default)]
    pub represents: Option<String>,
    /// Viewers with direct control of the entity.
    #[serde(default)]
    pub controlled_by: Vec<String>,
    /// Host draw order within the context.
    #[serde(default)]
    pub z_order: i64,
    /// Any further host attributes, carried verbatim on clone.
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_layer() -> String {
    "objects".to_owned()
}

/// Attribute set for an entity the host is asked to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDraft {
    /// Context to create the entity in.
    pub context_id: ContextId,
    /// Display name.
    pub name: String,
    /// Token or other.
    pub kind: EntityKind,
    /// Anchor point.
    pub position: Point,
    /// Appearance reference.
    pub image: String,
    /// Rendered size.
    pub size: Size,
    /// Host layer.
    pub layer: String,
    /// Represented template.
    pub represents: Option<String>,
    /// Direct controllers.
    pub controlled_by: Vec<String>,
    /// Carried attributes.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Unions direct and template controllers, keeping first-seen order and
/// dropping blanks and duplicates.
#[must_use]
pub fn merge_controllers(direct: &[String], template: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(direct.len() + template.len());
    for viewer in direct.iter().chain(template) {
        let viewer = viewer.trim();
        if viewer.is_empty() || merged.iter().any(|v| v == viewer) {
            continue;
        }
        merged.push(viewer.to_owned());
    }
    merged
}
