//! Traversal resolution: where a portal sends its traveller.
//!
//! Resolution is a pure computation over a group snapshot. The only input
//! that is not part of the snapshot is the RNG consulted by random mode.

use serde::{Deserialize, Serialize};
use traveler_core::rng::DeterministicRng;

use super::descriptor::TraversalMode;
use super::graph::PortalNode;

/// Why a trigger resolved to no movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StayReason {
    /// The group has no nodes.
    EmptyGroup,
    /// The triggering marker is not part of its own group snapshot.
    NotInGroup,
    /// Random mode needs at least one other node.
    NoOtherNode,
    /// Circle-exits never send anyone anywhere.
    CircleExit,
}

/// Result of resolving one trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'g> {
    /// Move to this node.
    Destination(&'g PortalNode),
    /// Do not move.
    Stay(StayReason),
    /// A circle-entry with no circle-exit anywhere in the group.
    NoExit,
}

/// Resolves the destination for a traveller standing on
/// `nodes[current_index]`, a node with the given `mode` and `node_id`.
pub fn resolve<'g>(
    nodes: &'g [PortalNode],
    current_index: Option<usize>,
    mode: TraversalMode,
    node_id: i64,
    rng: &mut dyn DeterministicRng,
) -> Resolution<'g> {
    let total = nodes.len();
    if total == 0 {
        return Resolution::Stay(StayReason::EmptyGroup);
    }
    let Some(current) = current_index.filter(|&i| i < total) else {
        return Resolution::Stay(StayReason::NotInGroup);
    };

    match mode {
        TraversalMode::Ascending => Resolution::Destination(&nodes[(current + 1) % total]),
        TraversalMode::Descending => {
            Resolution::Destination(&nodes[(current + total - 1) % total])
        }
        TraversalMode::Random => random_other(nodes, current, rng)
            .map_or(Resolution::Stay(StayReason::NoOtherNode), Resolution::Destination),
        TraversalMode::OddEven => Resolution::Destination(next_same_parity(nodes, current)),
        TraversalMode::CircleEntry => {
            circle_exit(nodes, node_id).map_or(Resolution::NoExit, Resolution::Destination)
        }
        TraversalMode::CircleExit => Resolution::Stay(StayReason::CircleExit),
    }
}

/// Picks a uniformly random node other than `current` without rejection
/// sampling: draw from the `total - 1` other slots and skip over `current`.
fn random_other<'g>(
    nodes: &'g [PortalNode],
    current: usize,
    rng: &mut dyn DeterministicRng,
) -> Option<&'g PortalNode> {
    let others = nodes.len().checked_sub(1).filter(|&n| n > 0)?;
    let max = u32::try_from(others - 1).unwrap_or(u32::MAX);
    let draw = usize::try_from(rng.next_u32_range(0, max))
        .unwrap_or(usize::MAX)
        .min(others - 1);
    let index = if draw >= current { draw + 1 } else { draw };
    nodes.get(index)
}

fn next_same_parity(nodes: &[PortalNode], current: usize) -> &PortalNode {
    let parity = nodes[current].node_id.rem_euclid(2);
    let subset: Vec<usize> = (0..nodes.len())
        .filter(|&i| nodes[i].node_id.rem_euclid(2) == parity)
        .collect();
    // `current` is always in its own parity subset.
    let position = subset.iter().position(|&i| i == current).unwrap_or(0);
    &nodes[subset[(position + 1) % subset.len()]]
}

fn circle_exit(nodes: &[PortalNode], node_id: i64) -> Option<&PortalNode> {
    let is_exit = |node: &&PortalNode| node.mode == TraversalMode::CircleExit;
    nodes
        .iter()
        .filter(is_exit)
        .find(|node| node.node_id == node_id)
        .or_else(|| nodes.iter().find(is_exit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::GroupGraph;
    use traveler_core::scene::{ContextId, Marker, MarkerId, Point, Size};
    use traveler_test_support::{MockRng, SequenceRng};

    fn graph(names: &[&str]) -> GroupGraph {
        let markers: Vec<Marker> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Marker {
                id: MarkerId::new(format!("m{i}")),
                name: (*name).to_owned(),
                position: Point::new(0.0, 0.0),
                size: Size::new(70.0, 70.0),
                context_id: ContextId::new("page-a"),
            })
            .collect();
        let group = names
            .first()
            .and_then(|n| n.split(':').nth(1))
            .unwrap_or("Unknown")
            .to_owned();
        GroupGraph::build(&markers, &group, "Traveler")
    }

    /// Resolves from the node with `from_id` (first match) and returns the
    /// destination's node id.
    fn resolve_from(
        graph: &GroupGraph,
        from_id: i64,
        rng: &mut dyn DeterministicRng,
    ) -> Option<i64> {
        let current = graph.nodes().iter().position(|n| n.node_id == from_id);
        let node = &graph.nodes()[current.unwrap()];
        match resolve(graph.nodes(), current, node.mode, node.node_id, rng) {
            Resolution::Destination(dest) => Some(dest.node_id),
            Resolution::Stay(_) | Resolution::NoExit => None,
        }
    }

    #[test]
    fn test_ascending_advances_and_wraps() {
        let g = graph(&["Traveler:City:1", "Traveler:City:2", "Traveler:City:3"]);

        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(2));
        assert_eq!(resolve_from(&g, 2, &mut MockRng), Some(3));
        assert_eq!(resolve_from(&g, 3, &mut MockRng), Some(1));
    }

    #[test]
    fn test_descending_retreats_and_wraps() {
        let g = graph(&[
            "Traveler:City:1:descending",
            "Traveler:City:2:descending",
            "Traveler:City:3:descending",
        ]);

        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(3));
        assert_eq!(resolve_from(&g, 3, &mut MockRng), Some(2));
    }

    #[test]
    fn test_unknown_mode_behaves_as_ascending() {
        let g = graph(&["Traveler:City:1:zigzag", "Traveler:City:2"]);

        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(2));
    }

    #[test]
    fn test_single_ascending_node_resolves_to_itself() {
        let g = graph(&["Traveler:Solo:1"]);

        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(1));
    }

    #[test]
    fn test_odd_even_stays_within_parity() {
        let g = graph(&[
            "Traveler:Sewer:1:odd-even",
            "Traveler:Sewer:2:odd-even",
            "Traveler:Sewer:3:odd-even",
            "Traveler:Sewer:4:odd-even",
        ]);

        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(3));
        assert_eq!(resolve_from(&g, 3, &mut MockRng), Some(1));
        assert_eq!(resolve_from(&g, 2, &mut MockRng), Some(4));
        assert_eq!(resolve_from(&g, 4, &mut MockRng), Some(2));
    }

    #[test]
    fn test_odd_even_handles_negative_ids() {
        let g = graph(&[
            "Traveler:Pit:-3:odd-even",
            "Traveler:Pit:-2:odd-even",
            "Traveler:Pit:1:odd-even",
        ]);

        assert_eq!(resolve_from(&g, -3, &mut MockRng), Some(1));
        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(-3));
    }

    #[test]
    fn test_circle_entries_lead_to_the_exit() {
        let g = graph(&[
            "Traveler:Ring:1:circle-entry",
            "Traveler:Ring:2:circle-entry",
            "Traveler:Ring:3:circle-entry",
            "Traveler:Ring:9:circle-exit",
        ]);

        assert_eq!(resolve_from(&g, 1, &mut MockRng), Some(9));
        assert_eq!(resolve_from(&g, 2, &mut MockRng), Some(9));
        assert_eq!(resolve_from(&g, 3, &mut MockRng), Some(9));
        assert_eq!(resolve_from(&g, 9, &mut MockRng), None);
    }

    #[test]
    fn test_circle_entry_prefers_exit_with_matching_id() {
        let g = graph(&[
            "Traveler:Ring:1:circle-exit",
            "Traveler:Ring:2:circle-entry",
            "Traveler:Ring:2:circle-exit",
        ]);
        let nodes = g.nodes();

        let resolution = resolve(nodes, Some(1), TraversalMode::CircleEntry, 2, &mut MockRng);

        assert_eq!(resolution, Resolution::Destination(&nodes[2]));
    }

    #[test]
    fn test_circle_entry_without_exit_reports_no_exit() {
        let g = graph(&["Traveler:Ring:1:circle-entry", "Traveler:Ring:2"]);

        let resolution = resolve(g.nodes(), Some(0), TraversalMode::CircleEntry, 1, &mut MockRng);

        assert_eq!(resolution, Resolution::NoExit);
    }

    #[test]
    fn test_circle_exit_never_moves() {
        let g = graph(&["Traveler:Ring:1:circle-exit", "Traveler:Ring:2"]);

        let resolution = resolve(g.nodes(), Some(0), TraversalMode::CircleExit, 1, &mut MockRng);

        assert_eq!(resolution, Resolution::Stay(StayReason::CircleExit));
    }

    #[test]
    fn test_random_with_single_node_stays() {
        let g = graph(&["Traveler:Maze:1:random"]);

        let resolution = resolve(g.nodes(), Some(0), TraversalMode::Random, 1, &mut MockRng);

        assert_eq!(resolution, Resolution::Stay(StayReason::NoOtherNode));
    }

    #[test]
    fn test_random_never_picks_current_node() {
        let g = graph(&[
            "Traveler:Maze:1:random",
            "Traveler:Maze:2:random",
            "Traveler:Maze:3:random",
        ]);
        // Draws 0 and 1 over the two "other" slots from node 2 (index 1).
        let mut rng = SequenceRng::new(vec![0, 1]);

        assert_eq!(resolve_from(&g, 2, &mut rng), Some(1));
        assert_eq!(resolve_from(&g, 2, &mut rng), Some(3));
    }

    #[test]
    fn test_random_clamps_out_of_range_draws() {
        let g = graph(&["Traveler:Maze:1:random", "Traveler:Maze:2:random"]);
        let mut rng = SequenceRng::new(vec![40]);

        assert_eq!(resolve_from(&g, 2, &mut rng), Some(1));
    }

    #[test]
    fn test_empty_group_stays() {
        let resolution = resolve(&[], Some(0), TraversalMode::Ascending, 1, &mut MockRng);

        assert_eq!(resolution, Resolution::Stay(StayReason::EmptyGroup));
    }

    #[test]
    fn test_missing_current_index_stays() {
        let g = graph(&["Traveler:City:1", "Traveler:City:2"]);

        assert_eq!(
            resolve(g.nodes(), None, TraversalMode::Ascending, 1, &mut MockRng),
            Resolution::Stay(StayReason::NotInGroup)
        );
        assert_eq!(
            resolve(g.nodes(), Some(5), TraversalMode::Ascending, 1, &mut MockRng),
            Resolution::Stay(StayReason::NotInGroup)
        );
    }
}
