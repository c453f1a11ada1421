//! Query handlers for the portal engine.
//!
//! Queries read the scene and the engine state and return read-only view
//! DTOs. They never arm cooldowns or move anything.

use std::sync::Mutex;

use serde::Serialize;
use traveler_core::clock::Clock;
use traveler_core::error::TravelerError;
use traveler_core::host::SceneHost;
use traveler_core::scene::{ContextId, MarkerId, Point};

use crate::config::TravelerConfig;
use crate::domain::descriptor::{self, TraversalMode};
use crate::domain::graph::GroupGraph;
use crate::domain::store::TravelerStore;

/// Read-only view of one node in a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalNodeView {
    /// Parsed node id.
    pub node_id: i64,
    /// The node's own traversal mode.
    pub mode: TraversalMode,
    /// Backing marker.
    pub marker_id: MarkerId,
    /// Raw marker name.
    pub marker_name: String,
    /// Context the marker lives in.
    pub context_id: ContextId,
    /// Marker centre.
    pub position: Point,
}

/// Read-only view of a group graph, in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupGraphView {
    /// The group name the graph was built for.
    pub group: String,
    /// Ordered nodes.
    pub nodes: Vec<PortalNodeView>,
}

/// Builds the graph a trigger in `group` would currently see.
///
/// # Errors
///
/// Returns the host's error if markers cannot be listed.
pub async fn get_group_graph(
    group: &str,
    config: &TravelerConfig,
    host: &dyn SceneHost,
) -> Result<GroupGraphView, TravelerError> {
    let portals: Vec<_> = host
        .markers()
        .await?
        .into_iter()
        .filter(|marker| descriptor::parse(&marker.name, &config.portal_keyword).is_portal)
        .collect();
    let graph = GroupGraph::build(&portals, group, &config.portal_keyword);

    Ok(GroupGraphView {
        group: graph.group().to_owned(),
        nodes: graph
            .nodes()
            .iter()
            .map(|node| PortalNodeView {
                node_id: node.node_id,
                mode: node.mode,
                marker_id: node.marker.id.clone(),
                marker_name: node.marker.name.clone(),
                context_id: node.marker.context_id.clone(),
                position: node.marker.position,
            })
            .collect(),
    })
}

/// Read-only view of the engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatusView {
    /// Whether the external notifier is invoked.
    pub notifications_enabled: bool,
    /// Live cooldown entries (ids and names).
    pub active_cooldowns: usize,
    /// Camera-follow sequences still pending.
    pub pending_follows: usize,
}

/// Reports the engine state, creating it if the host discarded it.
///
/// # Errors
///
/// Returns `TravelerError::StatePoisoned` if the store cannot be locked.
pub fn get_engine_status(
    clock: &dyn Clock,
    store: &Mutex<TravelerStore>,
) -> Result<EngineStatusView, TravelerError> {
    let mut guard = store
        .lock()
        .map_err(|e| TravelerError::StatePoisoned(format!("store mutex poisoned: {e}")))?;
    let state = guard.ensure();
    state.cooldowns.purge_expired(clock.now());

    Ok(EngineStatusView {
        notifications_enabled: state.notifications_enabled,
        active_cooldowns: state.cooldowns.len(),
        pending_follows: state.follows.len(),
    })
}
