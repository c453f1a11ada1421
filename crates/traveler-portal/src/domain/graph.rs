//! Group graphs: the ordered node list of one portal group.

use traveler_core::scene::{ContextId, Marker, MarkerId};

use super::descriptor::{self, TraversalMode};

/// One marker's place within its group.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalNode {
    /// Node id parsed from the marker name.
    pub node_id: i64,
    /// This node's own traversal mode.
    pub mode: TraversalMode,
    /// The marker backing this node.
    pub marker: Marker,
}

impl PortalNode {
    /// Context the node's marker lives in.
    #[must_use]
    pub fn context_id(&self) -> &ContextId {
        &self.marker.context_id
    }
}

/// Nodes of one group ordered ascending by node id.
///
/// Ordering is stable: nodes sharing an id keep marker enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupGraph {
    group: String,
    nodes: Vec<PortalNode>,
}

impl GroupGraph {
    /// Collects every portal marker whose raw name contains `group`.
    ///
    /// Membership is a substring test on the whole name, not an exact match
    /// on the parsed group, so a `City` graph also picks up `OldCity` nodes.
    #[must_use]
    pub fn build(markers: &[Marker], group: &str, keyword: &str) -> Self {
        let mut nodes: Vec<PortalNode> = markers
            .iter()
            .filter(|marker| marker.name.contains(group))
            .filter_map(|marker| {
                let parsed = descriptor::parse(&marker.name, keyword);
                parsed.is_portal.then(|| PortalNode {
                    node_id: parsed.node_id,
                    mode: parsed.mode,
                    marker: marker.clone(),
                })
            })
            .collect();
        nodes.sort_by_key(|node| node.node_id);

        Self {
            group: group.to_owned(),
            nodes,
        }
    }

    /// The group name this graph was built for.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Ordered nodes.
    #[must_use]
    pub fn nodes(&self) -> &[PortalNode] {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the group has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node backed by `marker_id`.
    #[must_use]
    pub fn position_of(&self, marker_id: &MarkerId) -> Option<usize> {
        self.nodes.iter().position(|node| &node.marker.id == marker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traveler_core::scene::{Point, Size};

    fn marker(id: &str, name: &str) -> Marker {
        Marker {
            id: MarkerId::new(id),
            name: name.to_owned(),
            position: Point::new(0.0, 0.0),
            size: Size::new(70.0, 70.0),
            context_id: ContextId::new("page-a"),
        }
    }

    fn ids(graph: &GroupGraph) -> Vec<&str> {
        graph.nodes().iter().map(|n| n.marker.id.as_str()).collect()
    }

    #[test]
    fn test_build_orders_nodes_by_node_id() {
        let markers = vec![
            marker("m3", "Traveler:City:3"),
            marker("m1", "Traveler:City:1"),
            marker("m2", "Traveler:City:2"),
        ];

        let graph = GroupGraph::build(&markers, "City", "Traveler");

        assert_eq!(ids(&graph), vec!["m1", "m2", "m3"]);
        assert_eq!(graph.group(), "City");
    }

    #[test]
    fn test_build_keeps_declaration_order_for_duplicate_ids() {
        let markers = vec![
            marker("b", "Traveler:Keep:1:circle-entry"),
            marker("exit", "Traveler:Keep:0:circle-exit"),
            marker("a", "Traveler:Keep:1:circle-entry"),
        ];

        let graph = GroupGraph::build(&markers, "Keep", "Traveler");

        assert_eq!(ids(&graph), vec!["exit", "b", "a"]);
    }

    #[test]
    fn test_build_uses_substring_membership() {
        let markers = vec![
            marker("city", "Traveler:City:1"),
            marker("old", "Traveler:OldCity:2"),
            marker("port", "Traveler:Port:1"),
        ];

        let graph = GroupGraph::build(&markers, "City", "Traveler");

        assert_eq!(ids(&graph), vec!["city", "old"]);
    }

    #[test]
    fn test_build_skips_non_portal_markers() {
        let markers = vec![
            marker("m1", "Traveler:City:1"),
            marker("sign", "City gate sign"),
        ];

        let graph = GroupGraph::build(&markers, "City", "Traveler");

        assert_eq!(graph.len(), 1);
        assert!(graph.position_of(&MarkerId::new("sign")).is_none());
    }

    #[test]
    fn test_position_of_finds_marker_index() {
        let markers = vec![
            marker("m2", "Traveler:City:2"),
            marker("m1", "Traveler:City:1"),
        ];

        let graph = GroupGraph::build(&markers, "City", "Traveler");

        assert_eq!(graph.position_of(&MarkerId::new("m2")), Some(1));
        assert!(!graph.is_empty());
    }
}
