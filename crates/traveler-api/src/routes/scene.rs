//! Routes for inspecting and furnishing the scene.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use traveler_core::scene::{
    ContextId, Entity, EntityId, EntityKind, Marker, MarkerId, Point, Size,
};

use crate::error::ApiError;
use crate::scene::SceneSnapshot;
use crate::state::AppState;

fn default_extent() -> f64 {
    70.0
}

/// Request body for POST /markers.
#[derive(Debug, Deserialize)]
pub struct PlaceMarkerRequest {
    /// Marker id; generated when absent.
    pub id: Option<String>,
    /// Display name, e.g. `Traveler:Keep:2:random`.
    pub name: String,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Zone width.
    #[serde(default = "default_extent")]
    pub width: f64,
    /// Zone height.
    #[serde(default = "default_extent")]
    pub height: f64,
    /// Context to place the marker in.
    pub context_id: String,
}

/// Request body for POST /tokens.
#[derive(Debug, Deserialize)]
pub struct PlaceTokenRequest {
    /// Token id; generated when absent.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Rendered width.
    #[serde(default = "default_extent")]
    pub width: f64,
    /// Rendered height.
    #[serde(default = "default_extent")]
    pub height: f64,
    /// Context to place the token in.
    pub context_id: String,
    /// Token or other.
    #[serde(default)]
    pub kind: EntityKind,
    /// Appearance reference.
    pub image: Option<String>,
    /// Represented template.
    pub represents: Option<String>,
    /// Viewers with direct control.
    #[serde(default)]
    pub controlled_by: Vec<String>,
    /// Further host attributes.
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn generated_id(requested: Option<String>) -> String {
    requested
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

/// GET /
async fn get_scene(State(state): State<AppState>) -> Result<Json<SceneSnapshot>, ApiError> {
    Ok(Json(state.scene.snapshot()?))
}

/// POST /markers
#[instrument(skip(state, request), fields(name = %request.name))]
async fn place_marker(
    State(state): State<AppState>,
    Json(request): Json<PlaceMarkerRequest>,
) -> Result<Json<Marker>, ApiError> {
    let marker = Marker {
        id: MarkerId::new(generated_id(request.id)),
        name: request.name,
        position: Point::new(request.x, request.y),
        size: Size::new(request.width, request.height),
        context_id: ContextId::new(request.context_id),
    };
    info!(marker_id = %marker.id, "placing marker");
    state.scene.place_marker(marker.clone())?;
    Ok(Json(marker))
}

/// POST /tokens
#[instrument(skip(state, request), fields(name = %request.name))]
async fn place_token(
    State(state): State<AppState>,
    Json(request): Json<PlaceTokenRequest>,
) -> Result<Json<Entity>, ApiError> {
    let entity = Entity {
        id: EntityId::new(generated_id(request.id)),
        name: request.name,
        kind: request.kind,
        position: Point::new(request.x, request.y),
        context_id: ContextId::new(request.context_id),
        image: request.image,
        size: Size::new(request.width, request.height),
        layer: "objects".to_owned(),
        represents: request.represents,
        controlled_by: request.controlled_by,
        z_order: 0,
        extra: request.extra,
    };
    info!(entity_id = %entity.id, "placing token");
    state.scene.place_entity(entity.clone())?;
    Ok(Json(entity))
}

/// Returns the router for the scene.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_scene))
        .route("/markers", post(place_marker))
        .route("/tokens", post(place_token))
}
