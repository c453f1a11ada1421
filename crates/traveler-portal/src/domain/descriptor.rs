//! Portal descriptors parsed from marker display names.
//!
//! A portal marker is named `Traveler:<group>:<node>[:<mode>]`. Parsing is
//! total: missing or malformed segments fall back to defaults rather than
//! failing, since most portals never spell out a mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Group name used when the name has no group segment.
pub const DEFAULT_GROUP: &str = "Unknown";

/// Separator between name segments.
pub const SEGMENT_SEPARATOR: char = ':';

/// Traversal policy of a portal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalMode {
    /// Next node by ascending id, wrapping.
    #[default]
    Ascending,
    /// Previous node by ascending id, wrapping.
    Descending,
    /// Any other node, uniformly.
    Random,
    /// Next node with the same id parity, wrapping.
    OddEven,
    /// Shortcut to a circle-exit.
    CircleEntry,
    /// Terminal node; never sends anyone anywhere.
    CircleExit,
}

impl TraversalMode {
    /// Parses a mode segment. Unknown modes are treated as ascending.
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        match segment.trim().to_lowercase().as_str() {
            "descending" => Self::Descending,
            "random" => Self::Random,
            "odd-even" => Self::OddEven,
            "circle-entry" => Self::CircleEntry,
            "circle-exit" => Self::CircleExit,
            _ => Self::Ascending,
        }
    }

    /// Canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Random => "random",
            Self::OddEven => "odd-even",
            Self::CircleEntry => "circle-entry",
            Self::CircleExit => "circle-exit",
        }
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured view of a marker name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalDescriptor {
    /// Whether the first segment is the portal keyword.
    pub is_portal: bool,
    /// Group the node belongs to.
    pub group_name: String,
    /// Node id within the group.
    pub node_id: i64,
    /// Traversal mode of this node.
    pub mode: TraversalMode,
}

/// Parses a marker display name against the reserved `keyword`.
#[must_use]
pub fn parse(name: &str, keyword: &str) -> PortalDescriptor {
    let segments: Vec<&str> = name.split(SEGMENT_SEPARATOR).map(str::trim).collect();
    let segment = |i: usize| segments.get(i).copied().filter(|s| !s.is_empty());

    PortalDescriptor {
        is_portal: segments.first().is_some_and(|s| *s == keyword),
        group_name: segment(1).unwrap_or(DEFAULT_GROUP).to_owned(),
        node_id: segment(2).map_or(0, parse_node_id),
        mode: segment(3).map_or(TraversalMode::Ascending, TraversalMode::from_segment),
    }
}

/// Reads the leading signed decimal integer of `segment`, so `"3b"` is 3.
/// Anything without leading digits, or out of range, is 0.
fn parse_node_id(segment: &str) -> i64 {
    let digits_start = usize::from(segment.starts_with(['+', '-']));
    let digits_len = segment[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return 0;
    }
    segment[..digits_start + digits_len].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORD: &str = "Traveler";

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = parse("Traveler:RavengaardCity:2:descending", KEYWORD);

        assert_eq!(
            descriptor,
            PortalDescriptor {
                is_portal: true,
                group_name: "RavengaardCity".to_owned(),
                node_id: 2,
                mode: TraversalMode::Descending,
            }
        );
    }

    #[test]
    fn test_parse_missing_trailing_segments_defaults() {
        let descriptor = parse("Traveler:City", KEYWORD);

        assert!(descriptor.is_portal);
        assert_eq!(descriptor.group_name, "City");
        assert_eq!(descriptor.node_id, 0);
        assert_eq!(descriptor.mode, TraversalMode::Ascending);
    }

    #[test]
    fn test_parse_keyword_only_defaults_group() {
        let descriptor = parse("Traveler", KEYWORD);

        assert!(descriptor.is_portal);
        assert_eq!(descriptor.group_name, DEFAULT_GROUP);
        assert_eq!(descriptor.node_id, 0);
    }

    #[test]
    fn test_parse_trims_segments_and_lowercases_mode() {
        let descriptor = parse(" Traveler : Keep : 7 : Circle-Entry ", KEYWORD);

        assert!(descriptor.is_portal);
        assert_eq!(descriptor.group_name, "Keep");
        assert_eq!(descriptor.node_id, 7);
        assert_eq!(descriptor.mode, TraversalMode::CircleEntry);
    }

    #[test]
    fn test_parse_unparsable_node_id_is_zero() {
        assert_eq!(parse("Traveler:City:north", KEYWORD).node_id, 0);
        assert_eq!(parse("Traveler:City:", KEYWORD).node_id, 0);
        assert_eq!(parse("Traveler:City:-", KEYWORD).node_id, 0);
        assert_eq!(
            parse("Traveler:City:99999999999999999999999", KEYWORD).node_id,
            0
        );
    }

    #[test]
    fn test_parse_node_id_reads_leading_integer() {
        assert_eq!(parse("Traveler:City:3b", KEYWORD).node_id, 3);
        assert_eq!(parse("Traveler:City:-4", KEYWORD).node_id, -4);
        assert_eq!(parse("Traveler:City:+12.5", KEYWORD).node_id, 12);
    }

    #[test]
    fn test_parse_unknown_and_empty_mode_is_ascending() {
        assert_eq!(
            parse("Traveler:City:1:sideways", KEYWORD).mode,
            TraversalMode::Ascending
        );
        assert_eq!(parse("Traveler:City:1:", KEYWORD).mode, TraversalMode::Ascending);
    }

    #[test]
    fn test_parse_requires_exact_keyword() {
        assert!(!parse("traveler:City:1", KEYWORD).is_portal);
        assert!(!parse("Travelers:City:1", KEYWORD).is_portal);
        assert!(!parse("Bram the Bold", KEYWORD).is_portal);
        assert!(!parse("", KEYWORD).is_portal);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let name = "Traveler:Sewers:5:odd-even";

        assert_eq!(parse(name, KEYWORD), parse(name, KEYWORD));
    }

    #[test]
    fn test_mode_round_trips_through_its_name() {
        for mode in [
            TraversalMode::Ascending,
            TraversalMode::Descending,
            TraversalMode::Random,
            TraversalMode::OddEven,
            TraversalMode::CircleEntry,
            TraversalMode::CircleExit,
        ] {
            assert_eq!(TraversalMode::from_segment(mode.as_str()), mode);
        }
    }
}
